//! Configuration system for contactbook.
//!
//! Configuration can be assembled programmatically through [`ConfigBuilder`]
//! or loaded from files and environment variables through [`ConfigLoader`].
//! Both paths validate the result before handing it out.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "contactbook.toml",
    "contactbook.yaml",
    "contactbook.yml",
    "contactbook.json",
    ".contactbook/config.toml",
    ".contactbook/config.yaml",
    ".contactbook/config.yml",
    ".contactbook/config.json",
];

/// Environment variable prefix for contactbook configuration
pub const ENV_PREFIX: &str = "CONTACTBOOK_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
