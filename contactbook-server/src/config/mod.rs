//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token (and cookie) lifetime in hours
    pub jwt_expiration_hours: u64,

    /// Send the jwt cookie with the Secure attribute
    pub secure_cookies: bool,

    /// Allow user signup
    pub allow_signup: bool,

    /// Library configuration file, if any
    pub config_file_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            max_request_size: 1024 * 1024, // 1MB
            jwt_secret: "".to_string(),   // Generated at runtime if not provided
            jwt_expiration_hours: 24 * 7,
            secure_cookies: false,
            allow_signup: true,
            config_file_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables.
    /// CLI arguments take precedence over environment variables.
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("CONTACTBOOK_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Ok(max_size) = env::var("CONTACTBOOK_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(jwt_secret) = cli_args.jwt_secret {
            config.jwt_secret = jwt_secret;
        } else if let Ok(jwt_secret) = env::var("CONTACTBOOK_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        }

        if config.jwt_secret.is_empty() {
            config.jwt_secret = Self::generate_jwt_secret();
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Ok(exp_hours) = env::var("CONTACTBOOK_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }

        if let Some(secure) = cli_args.secure_cookies {
            config.secure_cookies = secure;
        } else if let Ok(secure) = env::var("CONTACTBOOK_SECURE_COOKIES") {
            config.secure_cookies = secure.parse().unwrap_or(false);
        }

        if let Some(allow_signup) = cli_args.allow_signup {
            config.allow_signup = allow_signup;
        } else if let Ok(allow_signup) = env::var("CONTACTBOOK_ALLOW_SIGNUP") {
            config.allow_signup = allow_signup.parse().unwrap_or(true);
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file_path = Some(config_path);
        } else if let Ok(config_path) = env::var("CONTACTBOOK_CONFIG_FILE") {
            config.config_file_path = Some(PathBuf::from(config_path));
        }

        Ok(config)
    }

    /// Generate a random JWT secret
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;
        use rand::distr::Alphanumeric;
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }
}
