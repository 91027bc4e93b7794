//! Storage layer for users and mirrored contact relations.
//!
//! The [`traits`] module defines the storage contracts; [`surreal`] provides
//! the SurrealDB implementation used in production and in tests (in-memory
//! engine).

pub mod config;
pub mod errors;
pub mod models;
pub mod surreal;
pub mod traits;

pub use errors::{StorageError, StorageResult};
pub use surreal::{EmbeddedStore, SurrealStore};

use crate::config::StorageConfig;
use config::SurrealDBEngine;
use surrealdb::Surreal;
use surrealdb::engine::local::{Mem, RocksDb};

/// Open the configured embedded SurrealDB store and apply the schema
pub async fn create_store(config: &StorageConfig) -> StorageResult<EmbeddedStore> {
    let client = match config.surrealdb.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating in-memory contact store");
            Surreal::new::<Mem>(()).await.map_err(|e| {
                StorageError::Connection(format!("Failed to create memory client: {}", e))
            })?
        }
        SurrealDBEngine::RocksDB => {
            let path = config.database_path();
            tracing::info!("Creating RocksDB contact store at {}", path.display());

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Configuration(format!(
                        "Failed to create data directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }

            Surreal::new::<RocksDb>(path).await.map_err(|e| {
                StorageError::Connection(format!("Failed to create RocksDB client: {}", e))
            })?
        }
    };

    SurrealStore::new(client, config.surrealdb.clone()).await
}
