//! Contact storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use uuid::Uuid;

use super::base::{ConflictMeaning, SurrealStore, check_transaction, classify_failure};
use crate::storage::errors::StorageError;
use crate::storage::models::{ContactRecord, ContactStatus};
use crate::storage::traits::ContactStore;

/// Internal representation of a contact row for SurrealDB
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SurrealContact {
    contact_id: String,
    owner: String,
    peer: String,
    status: String,
    #[serde(default)]
    nickname: Option<String>,
    requested_by: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    accepted_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl From<&ContactRecord> for SurrealContact {
    fn from(record: &ContactRecord) -> Self {
        Self {
            contact_id: record.id.to_string(),
            owner: record.owner.to_string(),
            peer: record.peer.to_string(),
            status: record.status.as_str().to_string(),
            nickname: record.nickname.clone(),
            requested_by: record.requested_by.to_string(),
            created_at: record.created_at,
            accepted_at: record.accepted_at,
            updated_at: record.updated_at,
        }
    }
}

impl TryFrom<SurrealContact> for ContactRecord {
    type Error = StorageError;

    fn try_from(row: SurrealContact) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid("contact_id", &row.contact_id)?,
            owner: parse_uuid("owner", &row.owner)?,
            peer: parse_uuid("peer", &row.peer)?,
            status: row
                .status
                .parse()
                .map_err(StorageError::Serialization)?,
            nickname: row.nickname,
            requested_by: parse_uuid("requested_by", &row.requested_by)?,
            created_at: row.created_at,
            accepted_at: row.accepted_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(value)
        .map_err(|e| StorageError::Serialization(format!("Invalid {} '{}': {}", field, value, e)))
}

fn into_records(rows: Vec<SurrealContact>) -> Result<Vec<ContactRecord>, StorageError> {
    rows.into_iter().map(ContactRecord::try_from).collect()
}

/// Matches both rows of the pair `($a, $b)`
const PAIR_CONDITION: &str = "((owner = $a AND peer = $b) OR (owner = $b AND peer = $a))";

#[async_trait]
impl<C> ContactStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn find_relation(&self, a: Uuid, b: Uuid) -> Result<Option<ContactRecord>, StorageError> {
        let query = format!("SELECT * FROM contact WHERE {} LIMIT 1", PAIR_CONDITION);

        let rows: Vec<SurrealContact> = self
            .client
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to find relation: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract relation: {}", e)))?;

        rows.into_iter()
            .next()
            .map(ContactRecord::try_from)
            .transpose()
    }

    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, StorageError> {
        let rows: Vec<SurrealContact> = self
            .client
            .query("SELECT * FROM contact WHERE contact_id = $id LIMIT 1")
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get contact: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract contact: {}", e)))?;

        rows.into_iter()
            .next()
            .map(ContactRecord::try_from)
            .transpose()
    }

    async fn list_contacts(
        &self,
        owner: Uuid,
        status: ContactStatus,
    ) -> Result<Vec<ContactRecord>, StorageError> {
        let rows: Vec<SurrealContact> = self
            .client
            .query("SELECT * FROM contact WHERE owner = $owner AND status = $status")
            .bind(("owner", owner.to_string()))
            .bind(("status", status.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list contacts: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract contacts: {}", e)))?;

        into_records(rows)
    }

    async fn create_bidirectional(
        &self,
        requester: Uuid,
        target: Uuid,
        status: ContactStatus,
    ) -> Result<(ContactRecord, ContactRecord), StorageError> {
        let now = Utc::now();
        let forward = ContactRecord::new(requester, target, status, requester, now);
        let reverse = ContactRecord::new(target, requester, status, requester, now);

        let query = r#"
            BEGIN TRANSACTION;
            CREATE type::thing("contact", $forward_id) CONTENT $forward;
            CREATE type::thing("contact", $reverse_id) CONTENT $reverse;
            COMMIT TRANSACTION;
        "#;

        let context = "Failed to create contact pair";
        let response = self
            .client
            .query(query)
            .bind(("forward_id", forward.id.to_string()))
            .bind(("forward", SurrealContact::from(&forward)))
            .bind(("reverse_id", reverse.id.to_string()))
            .bind(("reverse", SurrealContact::from(&reverse)))
            .await
            .map_err(|e| classify_failure(context, &[e.to_string()], ConflictMeaning::Duplicate))?;
        check_transaction(response, context, ConflictMeaning::Duplicate)?;

        tracing::debug!(
            requester = %requester,
            target = %target,
            status = %status,
            "Created contact pair"
        );

        Ok((forward, reverse))
    }

    async fn update_bidirectional_status(
        &self,
        a: Uuid,
        b: Uuid,
        status: ContactStatus,
    ) -> Result<usize, StorageError> {
        // Both rows receive the same timestamp; rows already in the target
        // status are filtered out so a repeated call is a no-op
        let stamp_accepted = if status == ContactStatus::Accepted {
            ", accepted_at = $now"
        } else {
            ""
        };
        let query = format!(
            r#"
            BEGIN TRANSACTION;
            UPDATE contact SET status = $status, updated_at = $now{}
                WHERE {} AND status != $status
                RETURN AFTER;
            COMMIT TRANSACTION;
            "#,
            stamp_accepted, PAIR_CONDITION
        );

        let context = "Failed to update contact pair";
        let response = self
            .client
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .bind(("status", status.as_str()))
            .bind(("now", Utc::now()))
            .await
            .map_err(|e| classify_failure(context, &[e.to_string()], ConflictMeaning::Abort))?;
        let mut response = check_transaction(response, context, ConflictMeaning::Abort)?;

        let updated: Vec<SurrealContact> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract updated contacts: {}", e))
        })?;

        tracing::debug!(a = %a, b = %b, status = %status, rows = updated.len(), "Updated contact pair");

        Ok(updated.len())
    }

    async fn delete_bidirectional(
        &self,
        a: Uuid,
        b: Uuid,
        status: Option<ContactStatus>,
    ) -> Result<usize, StorageError> {
        let status_condition = if status.is_some() {
            " AND status = $status"
        } else {
            ""
        };
        let query = format!(
            r#"
            BEGIN TRANSACTION;
            DELETE contact WHERE {}{} RETURN BEFORE;
            COMMIT TRANSACTION;
            "#,
            PAIR_CONDITION, status_condition
        );

        let context = "Failed to delete contact pair";
        let mut request = self
            .client
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()));
        if let Some(status) = status {
            request = request.bind(("status", status.as_str()));
        }

        let response = request
            .await
            .map_err(|e| classify_failure(context, &[e.to_string()], ConflictMeaning::Abort))?;
        let mut response = check_transaction(response, context, ConflictMeaning::Abort)?;

        let deleted: Vec<SurrealContact> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract deleted contacts: {}", e))
        })?;

        if deleted.is_empty() {
            return Err(StorageError::NotFound(format!(
                "No contact between {} and {}",
                a, b
            )));
        }

        tracing::debug!(a = %a, b = %b, rows = deleted.len(), "Deleted contact pair");

        Ok(deleted.len())
    }

    async fn set_nickname(
        &self,
        owner: Uuid,
        peer: Uuid,
        nickname: Option<String>,
    ) -> Result<Option<ContactRecord>, StorageError> {
        // Only the owner's row changes; the mirrored row keeps its own nickname
        let query = r#"
            UPDATE contact SET nickname = $nickname, updated_at = $now
                WHERE owner = $owner AND peer = $peer AND status = "accepted"
                RETURN AFTER
        "#;

        let rows: Vec<SurrealContact> = self
            .client
            .query(query)
            .bind(("owner", owner.to_string()))
            .bind(("peer", peer.to_string()))
            .bind(("nickname", nickname))
            .bind(("now", Utc::now()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to set nickname: {}", e)))?
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract contact: {}", e)))?;

        rows.into_iter()
            .next()
            .map(ContactRecord::try_from)
            .transpose()
    }
}
