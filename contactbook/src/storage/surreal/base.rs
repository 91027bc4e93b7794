//! Base SurrealDB store

use async_trait::async_trait;
use surrealdb::{Connection, Response, Surreal};

use crate::storage::config::SurrealDBConfig;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// SurrealDB-backed store for users and contacts
#[derive(Debug, Clone)]
pub struct SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SurrealDBConfig,
}

impl<C> SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Select the configured namespace/database and apply the schema
    pub async fn new(client: Surreal<C>, config: SurrealDBConfig) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let store = Self { client, config };
        super::schema::initialize_schema(&store.client).await?;

        Ok(store)
    }

    /// Namespace and database this store is bound to
    pub fn location(&self) -> (&str, &str) {
        (&self.config.namespace, &self.config.database)
    }
}

/// What a failed transaction means to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConflictMeaning {
    /// A write race or index violation means the record already exists
    Duplicate,
    /// A write race is a plain transaction failure
    Abort,
}

/// Fail if any statement of a transactional query failed.
///
/// When one statement of a transaction fails SurrealDB reports every other
/// statement as "not executed", so all messages are inspected to find the
/// cause.
pub(crate) fn check_transaction(
    mut response: Response,
    context: &str,
    meaning: ConflictMeaning,
) -> Result<Response, StorageError> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return Ok(response);
    }

    let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
    Err(classify_failure(context, &messages, meaning))
}

/// Map failure messages from a transaction to a storage error
pub(crate) fn classify_failure(
    context: &str,
    messages: &[String],
    meaning: ConflictMeaning,
) -> StorageError {
    let index_violation = messages.iter().any(|m| m.contains("already contains"));
    let write_conflict = messages
        .iter()
        .any(|m| m.to_lowercase().contains("conflict"));

    let detail = messages
        .iter()
        .find(|m| !m.contains("not executed"))
        .or_else(|| messages.first())
        .cloned()
        .unwrap_or_default();

    match (index_violation, write_conflict, meaning) {
        (true, _, _) | (false, true, ConflictMeaning::Duplicate) => {
            StorageError::AlreadyExists(format!("{}: {}", context, detail))
        }
        _ => StorageError::Transaction(format!("{}: {}", context, detail)),
    }
}

#[async_trait]
impl<C> BaseStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        self.client
            .health()
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let response = self
            .client
            .query("BEGIN TRANSACTION; DELETE contact; DELETE user; COMMIT TRANSACTION;")
            .await
            .map_err(|e| StorageError::Query(format!("Failed to clear store: {}", e)))?;
        check_transaction(response, "Failed to clear store", ConflictMeaning::Abort)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_index_violation_is_duplicate() {
        let msgs = messages(&[
            "The query was not executed due to a failed transaction",
            "Database index `contact_pair_idx` already contains ['a', 'b'], with record `contact:x`",
        ]);
        let err = classify_failure("create", &msgs, ConflictMeaning::Abort);
        assert!(err.is_already_exists());
        assert!(err.to_string().contains("contact_pair_idx"));
    }

    #[test]
    fn test_write_conflict_depends_on_meaning() {
        let msgs = messages(&[
            "Failed to commit transaction due to a read or write conflict. This transaction can be retried",
        ]);
        assert!(classify_failure("create", &msgs, ConflictMeaning::Duplicate).is_already_exists());
        assert!(matches!(
            classify_failure("update", &msgs, ConflictMeaning::Abort),
            StorageError::Transaction(_)
        ));
    }

    #[test]
    fn test_other_failures_are_transaction_errors() {
        let msgs = messages(&["Found 'x' for field `status`, but expected a string"]);
        let err = classify_failure("update", &msgs, ConflictMeaning::Duplicate);
        assert!(matches!(err, StorageError::Transaction(_)));
    }
}
