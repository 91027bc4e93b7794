use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use contactbook::config::{ConfigBuilder, ConfigLoader, ContactbookConfig};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;

mod api;
mod cli;
mod config;
mod error;
mod state;

use crate::api::create_router;
use crate::cli::CliArgs;
use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Set up logging
    let filter = match cli_args.log_level {
        Some(ref level) => tracing_subscriber::EnvFilter::try_new(level)?,
        None => tracing_subscriber::EnvFilter::from_default_env(),
    };
    let filter = filter
        .add_directive("surrealdb_core=warn".parse::<Directive>()?)
        .add_directive("surrealdb=warn".parse::<Directive>()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting contactbook server v{}", contactbook::VERSION);

    let server_config = ServerConfig::from_cli_and_env(cli_args)?;
    info!("Server configuration loaded");

    let library_config = load_library_config(&server_config)?;
    let contacts = contactbook::init(library_config).await?;
    info!("Contact manager initialized");

    let app_state = Arc::new(AppState::new(contacts, server_config.clone()));

    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);
    if !server_config.allow_signup {
        info!("User signup is disabled");
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Library configuration from the given file, else defaults, config files and env
fn load_library_config(server_config: &ServerConfig) -> Result<ContactbookConfig> {
    let mut loader = ConfigLoader::new();

    match &server_config.config_file_path {
        Some(path) => {
            info!("Loading contactbook configuration from {}", path.display());
            loader.load_file(path)?;
        }
        None => {
            loader.load_default_files();
        }
    }

    loader.load_env();

    match loader.extract() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("Invalid contactbook configuration: {}. Using defaults.", e);
            Ok(ConfigBuilder::new().with_default_storage().build()?)
        }
    }
}
