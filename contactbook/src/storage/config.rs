//! Configuration structures for the SurrealDB backend

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// On-disk location for the RocksDB engine; defaults to `<data_dir>/contacts`
    pub path: Option<PathBuf>,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::RocksDB,
            path: None,
            namespace: "contactbook".to_string(),
            database: "main".to_string(),
        }
    }
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
}
