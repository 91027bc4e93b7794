//! Structured logging setup based on `tracing`.
//!
//! The server binary installs its own `EnvFilter`-based subscriber; library
//! users and tests go through [`init`], which honours [`LoggingConfig`].


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::rolling::RollingFileAppender;

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    SubscriberError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// Installing a second global subscriber is not an error; the first one wins.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = log_level_to_level(config.level);

    let result = match config.format {
        LogFormat::Json => init_json_logging(level, config),
        LogFormat::Compact => init_compact_logging(level, config),
        LogFormat::Default | LogFormat::Pretty => init_pretty_logging(level, config),
    };

    if let Err(LogError::SubscriberError(ref e)) = result
        && e.to_string().contains("global default")
    {
        return Ok(());
    }

    result
}

/// Initialize logging with JSON formatting
fn init_json_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_target(true)
        .with_line_number(true);

    match &config.file {
        Some(file_path) if !config.stdout => {
            subscriber.with_writer(create_file_writer(file_path)?).try_init()?
        }
        _ => subscriber.try_init()?,
    }

    Ok(())
}

/// Initialize logging with compact formatting
fn init_compact_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_target(true)
        .with_line_number(true);

    match &config.file {
        Some(file_path) if !config.stdout => {
            subscriber.with_writer(create_file_writer(file_path)?).try_init()?
        }
        _ => subscriber.try_init()?,
    }

    Ok(())
}

/// Initialize logging with pretty formatting
fn init_pretty_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(level)
        .with_target(true)
        .with_line_number(true);

    match &config.file {
        Some(file_path) if !config.stdout => subscriber
            .with_ansi(false)
            .with_writer(create_file_writer(file_path)?)
            .try_init()?,
        _ => subscriber.try_init()?,
    }

    Ok(())
}

/// Create a non-rotating file appender, creating the parent directory if needed
fn create_file_writer(path: &Path) -> Result<RollingFileAppender> {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    let file_name = path.file_name().ok_or_else(|| {
        LogError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Log file path has no file name: {}", path.display()),
        ))
    })?;

    Ok(tracing_appender::rolling::never(directory, file_name))
}

/// Convert a configured level to a tracing level
pub fn log_level_to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// Convert a tracing level to a configured level
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level.parse().map_err(LogError::InvalidLogLevel)
}
