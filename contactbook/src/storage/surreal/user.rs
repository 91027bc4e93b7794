//! User storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use uuid::Uuid;

use super::base::{ConflictMeaning, SurrealStore, check_transaction, classify_failure};
use super::contact::parse_uuid;
use crate::storage::errors::StorageError;
use crate::storage::models::{NewUser, UserRecord};
use crate::storage::traits::UserStore;

/// Internal representation of a user record for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SurrealUser {
    user_id: String,
    full_name: String,
    email: String,
    #[serde(default)]
    profile_pic: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SurrealUser> for UserRecord {
    type Error = StorageError;

    fn try_from(row: SurrealUser) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid("user_id", &row.user_id)?,
            full_name: row.full_name,
            email: row.email,
            profile_pic: row.profile_pic,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_users(rows: Vec<SurrealUser>) -> Result<Vec<UserRecord>, StorageError> {
    rows.into_iter().map(UserRecord::try_from).collect()
}

#[async_trait]
impl<C> UserStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StorageError> {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            full_name: user.full_name.trim().to_string(),
            email: user.email.trim().to_lowercase(),
            profile_pic: user.profile_pic,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        let content = SurrealUser {
            user_id: record.id.to_string(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            profile_pic: record.profile_pic.clone(),
            password_hash: record.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };

        let context = "Failed to create user";
        let response = self
            .client
            .query(r#"CREATE type::thing("user", $id) CONTENT $user"#)
            .bind(("id", record.id.to_string()))
            .bind(("user", content))
            .await
            .map_err(|e| classify_failure(context, &[e.to_string()], ConflictMeaning::Duplicate))?;
        check_transaction(response, context, ConflictMeaning::Duplicate)?;

        tracing::debug!(user_id = %record.id, "Created user");

        Ok(record)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StorageError> {
        let rows: Vec<SurrealUser> = self
            .client
            .query("SELECT * FROM user WHERE user_id = $id LIMIT 1")
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get user: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract user: {}", e)))?;

        rows.into_iter().next().map(UserRecord::try_from).transpose()
    }

    async fn get_users(&self, ids: Vec<Uuid>) -> Result<Vec<UserRecord>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let rows: Vec<SurrealUser> = self
            .client
            .query("SELECT * FROM user WHERE user_id IN $ids")
            .bind(("ids", ids))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get users: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract users: {}", e)))?;

        into_users(rows)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let rows: Vec<SurrealUser> = self
            .client
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to find user: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract user: {}", e)))?;

        rows.into_iter().next().map(UserRecord::try_from).transpose()
    }

    async fn search_users(
        &self,
        needle: &str,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StorageError> {
        // Plain substring match; the needle is never interpreted as a pattern
        let query = r#"
            SELECT * FROM user
                WHERE user_id != $exclude
                AND (string::contains(string::lowercase(full_name), $needle)
                    OR string::contains(string::lowercase(email), $needle))
                ORDER BY full_name ASC
                LIMIT $limit
        "#;

        let rows: Vec<SurrealUser> = self
            .client
            .query(query)
            .bind(("exclude", exclude.to_string()))
            .bind(("needle", needle.to_lowercase()))
            .bind(("limit", limit as i64))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to search users: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract users: {}", e)))?;

        into_users(rows)
    }
}
