//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;
use crate::storage::config::SurrealDBEngine;

/// Validate the entire configuration.
pub fn validate_config(config: &ContactbookConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_contacts_config(&config.contacts)?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.surrealdb.namespace.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB namespace cannot be empty".to_string(),
        ));
    }
    if config.surrealdb.database.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB database cannot be empty".to_string(),
        ));
    }

    // Only the on-disk engine needs somewhere to write
    if config.surrealdb.engine == SurrealDBEngine::RocksDB
        && config.surrealdb.path.is_none()
        && config.data_dir.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate contact workflow limits.
fn validate_contacts_config(config: &ContactsConfig) -> Result<(), ConfigError> {
    if config.search_limit == 0 {
        return Err(ConfigError::ValidationError(
            "search_limit must be greater than 0".to_string(),
        ));
    }
    if config.min_query_len == 0 {
        return Err(ConfigError::ValidationError(
            "min_query_len must be greater than 0".to_string(),
        ));
    }
    if config.max_nickname_len == 0 {
        return Err(ConfigError::ValidationError(
            "max_nickname_len must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
