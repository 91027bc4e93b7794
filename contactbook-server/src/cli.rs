use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for contactbook-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub allow_signup: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub secure_cookies: Option<bool>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Command::new("contactbook-server")
            .version(contactbook::VERSION)
            .about("HTTP API server for contactbook contact relationships")
            .long_about(
                r#"Contactbook Server exposes the contact request workflow over HTTP:
listing contacts, searching users, sending, accepting and rejecting requests,
removing contacts and setting private nicknames. Data lives in an embedded
SurrealDB database.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.

Examples:
  contactbook-server --port 5001
  contactbook-server --config contactbook.toml --allow-signup=false
  contactbook-server --secure-cookies --log-level debug"#,
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: CONTACTBOOK_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Library configuration file path")
                    .long_help(
                        "Path to a TOML, YAML or JSON file with storage, logging and
contact settings. Without it the default configuration files are searched.
Environment variable: CONTACTBOOK_CONFIG_FILE",
                    )
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("allow_signup")
                    .long("allow-signup")
                    .value_name("BOOL")
                    .help("Allow user registration")
                    .long_help(
                        "Allow new users to register accounts via the signup API.
Environment variable: CONTACTBOOK_ALLOW_SIGNUP",
                    )
                    .value_parser(clap::value_parser!(bool)),
            )
            .arg(
                Arg::new("jwt_secret")
                    .long("jwt-secret")
                    .value_name("SECRET")
                    .help("JWT signing secret")
                    .long_help(
                        "Secret key used for signing JWT tokens. If not provided,
one is generated at startup and every token is invalidated on restart.
Environment variable: CONTACTBOOK_JWT_SECRET",
                    )
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("jwt_expiration")
                    .long("jwt-expiration")
                    .value_name("HOURS")
                    .help("JWT token expiration time in hours")
                    .long_help(
                        "How long JWT tokens and the jwt cookie remain valid.
Default is 168 hours (7 days).
Environment variable: CONTACTBOOK_JWT_EXPIRATION_HOURS",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("secure_cookies")
                    .long("secure-cookies")
                    .help("Mark the jwt cookie as Secure")
                    .long_help(
                        "Only send the jwt cookie over HTTPS. Enable in production.
Environment variable: CONTACTBOOK_SECURE_COOKIES",
                    )
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("max_request_size")
                    .long("max-request-size")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies.
Larger requests will be rejected.
Environment variable: CONTACTBOOK_MAX_REQUEST_SIZE",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .action(ArgAction::SetTrue),
            )
            .get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self {
            port: matches.get_one::<u16>("port").copied(),
            allow_signup: matches.get_one::<bool>("allow_signup").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            secure_cookies: if matches.get_flag("secure_cookies") {
                Some(true)
            } else {
                None
            },
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    fn print_env_help() {
        println!("Contactbook Server Environment Variables");
        println!("========================================");
        println!();
        println!("Server:");
        println!("  CONTACTBOOK_PORT                  - Server port (default: 5001)");
        println!("  CONTACTBOOK_MAX_REQUEST_SIZE      - Max request body size in bytes (default: 1MB)");
        println!("  CONTACTBOOK_CONFIG_FILE           - Library configuration file");
        println!();
        println!("Authentication:");
        println!("  CONTACTBOOK_JWT_SECRET            - JWT signing secret (generated if not set)");
        println!("  CONTACTBOOK_JWT_EXPIRATION_HOURS  - JWT expiration in hours (default: 168)");
        println!("  CONTACTBOOK_SECURE_COOKIES        - Mark the jwt cookie Secure (default: false)");
        println!("  CONTACTBOOK_ALLOW_SIGNUP          - Allow user registration (default: true)");
        println!();
        println!("Library (nested keys use a double underscore):");
        println!("  CONTACTBOOK_STORAGE__DATA_DIR     - Data directory for the embedded database");
        println!("  CONTACTBOOK_STORAGE__SURREALDB__ENGINE - Memory or RocksDB");
        println!("  CONTACTBOOK_CONTACTS__SEARCH_LIMIT - Max search results (default: 20)");
        println!();
        println!("Logging:");
        println!("  RUST_LOG                          - Logging level (error, warn, info, debug, trace)");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
    }
}
