//! Configuration builder.

use super::{Result, models::*, validation};
use crate::storage::config::SurrealDBEngine;
use std::path::Path;

/// Builder for creating ContactbookConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: ContactbookConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: ContactbookConfig::default(),
        }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Persist contacts in an embedded RocksDB database under the data directory
    pub fn with_default_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::RocksDB;
        self.config.storage.surrealdb.path = None;
        self
    }

    /// Use in-memory storage (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self
    }

    /// Use a SurrealDB namespace/database pair other than the defaults
    pub fn with_database(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.config.storage.surrealdb.namespace = namespace.into();
        self.config.storage.surrealdb.database = database.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log file path.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Cap the number of candidates returned by a search
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.config.contacts.search_limit = limit;
        self
    }

    /// Configuration suited to tests: in-memory storage, warnings only.
    pub fn testing() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Warn)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<ContactbookConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
