//! Schema initialization for the SurrealDB store

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Define the `user` and `contact` tables and their indexes
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let user_table_query = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS
            COMMENT "Registered users";

        DEFINE INDEX IF NOT EXISTS user_id_idx ON user FIELDS user_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_email_idx ON user FIELDS email UNIQUE;
    "#;

    // One row per direction; (owner, peer) is unique so a pair can never be
    // inserted twice, even by concurrent requests
    let contact_table_query = r#"
        DEFINE TABLE IF NOT EXISTS contact SCHEMALESS
            COMMENT "Mirrored contact relations, one row per owner";

        DEFINE INDEX IF NOT EXISTS contact_id_idx ON contact FIELDS contact_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS contact_pair_idx ON contact FIELDS owner, peer UNIQUE;
        DEFINE INDEX IF NOT EXISTS contact_owner_status_idx ON contact FIELDS owner, status;
        DEFINE INDEX IF NOT EXISTS contact_peer_status_idx ON contact FIELDS peer, status;
    "#;

    for (name, query) in [("user", user_table_query), ("contact", contact_table_query)] {
        client
            .query(query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to define {} table: {}", name, e)))?
            .check()
            .map_err(|e| StorageError::Query(format!("Failed to define {} table: {}", name, e)))?;
    }

    tracing::debug!("Contact store schema initialized");

    Ok(())
}
