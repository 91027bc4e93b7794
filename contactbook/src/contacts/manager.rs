//! Contact manager: request workflows and read-side queries

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{ContactError, Result};
use super::types::{Candidate, ContactSummary, PendingRequest, PendingRequests};
use super::validation::{normalize_nickname, normalize_query, parse_id};
use crate::config::ContactsConfig;
use crate::storage::errors::StorageError;
use crate::storage::models::{ContactRecord, ContactStatus, UserProfile};
use crate::storage::traits::{BaseStore, ContactStore, UserStore};

/// Entry point for every contact operation
#[derive(Debug, Clone)]
pub struct ContactManager {
    contacts: Arc<dyn ContactStore>,
    users: Arc<dyn UserStore>,
    base: Option<Arc<dyn BaseStore>>,
    config: ContactsConfig,
}

impl ContactManager {
    /// Create a manager over separate contact and user stores
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        users: Arc<dyn UserStore>,
        config: ContactsConfig,
    ) -> Self {
        Self {
            contacts,
            users,
            base: None,
            config,
        }
    }

    /// Create a manager over a single store implementing every storage trait
    pub fn from_store<S>(store: Arc<S>, config: ContactsConfig) -> Self
    where
        S: ContactStore + UserStore + BaseStore,
    {
        Self {
            contacts: store.clone(),
            users: store.clone(),
            base: Some(store),
            config,
        }
    }

    /// User directory backing this manager
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Contact store backing this manager
    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.contacts
    }

    pub fn config(&self) -> &ContactsConfig {
        &self.config
    }

    /// Check the backing store; managers without a base store report healthy
    pub async fn health_check(&self) -> Result<bool> {
        match &self.base {
            Some(base) => Ok(base.health_check().await?),
            None => Ok(true),
        }
    }

    /// Accepted contacts of `user`, most recently accepted first
    pub async fn list_accepted(&self, user: Uuid) -> Result<Vec<ContactSummary>> {
        let mut rows = self
            .contacts
            .list_contacts(user, ContactStatus::Accepted)
            .await?;
        // None sorts before Some, so rows missing the stamp end up last
        rows.sort_by(|a, b| b.accepted_at.cmp(&a.accepted_at));

        let profiles = self.load_profiles(&rows).await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let peer = profiles.get(&row.peer).cloned();
                if peer.is_none() {
                    warn!(owner = %row.owner, peer = %row.peer, "Contact points at a missing user");
                }
                peer.map(|peer| ContactSummary::new(row, peer))
            })
            .collect())
    }

    /// Pending requests of `user`, split by direction, newest first
    pub async fn list_pending(&self, user: Uuid) -> Result<PendingRequests> {
        let mut rows = self
            .contacts
            .list_contacts(user, ContactStatus::Pending)
            .await?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let profiles = self.load_profiles(&rows).await?;

        let mut pending = PendingRequests::default();
        for row in &rows {
            let Some(peer) = profiles.get(&row.peer).cloned() else {
                warn!(owner = %row.owner, peer = %row.peer, "Pending request points at a missing user");
                continue;
            };

            let request = PendingRequest {
                request_id: row.id,
                user: peer,
                created_at: row.created_at,
            };

            if row.requested_by == user {
                pending.sent.push(request);
            } else {
                pending.received.push(request);
            }
        }

        Ok(pending)
    }

    /// Users matching `query`, each annotated with the caller's relation to them
    pub async fn search_candidates(&self, user: Uuid, query: &str) -> Result<Vec<Candidate>> {
        let query = normalize_query(query, self.config.min_query_len)?;

        let matches = self
            .users
            .search_users(&query, user, self.config.search_limit)
            .await?;

        debug!(user = %user, query = %query, matches = matches.len(), "Searched users");

        let lookups = matches.into_iter().map(|candidate| async move {
            let relation = self.contacts.find_relation(user, candidate.id).await?;
            Ok::<_, ContactError>(Candidate::new(candidate.profile(), relation.as_ref()))
        });

        try_join_all(lookups).await
    }

    /// Send a contact request from `user` to the user identified by `target`.
    ///
    /// Returns the caller's row of the new pending pair.
    pub async fn send_request(&self, user: Uuid, target: &str) -> Result<ContactRecord> {
        let target = parse_id(target, "contactId")?;
        if target == user {
            return Err(ContactError::SelfRequest);
        }

        if self.users.get_user(target).await?.is_none() {
            return Err(ContactError::not_found("User", target));
        }

        // Blocked relations land here too and are refused like any other
        if let Some(existing) = self.contacts.find_relation(user, target).await? {
            return Err(ContactError::AlreadyRelated {
                peer: target,
                status: existing.status,
            });
        }

        let (forward, _) = self
            .contacts
            .create_bidirectional(user, target, ContactStatus::Pending)
            .await
            .map_err(|e| match e {
                // Lost a race against a concurrent request for the same pair
                StorageError::AlreadyExists(_) => ContactError::AlreadyRelated {
                    peer: target,
                    status: ContactStatus::Pending,
                },
                other => ContactError::Storage(other),
            })?;

        info!(requester = %user, target = %target, "Contact request sent");

        Ok(forward)
    }

    /// Accept a pending request received by `user`.
    ///
    /// The request must belong to `user` and must not have been sent by them.
    pub async fn accept_request(&self, user: Uuid, request_id: &str) -> Result<Uuid> {
        let request = self
            .find_pending_row(user, request_id)
            .await?
            .filter(|row| row.requested_by != user)
            .ok_or_else(|| ContactError::not_found("Request", request_id))?;

        let updated = self
            .contacts
            .update_bidirectional_status(user, request.peer, ContactStatus::Accepted)
            .await?;

        if updated == 0 {
            // Changed between the lookup and the update
            return Err(ContactError::not_found("Request", request_id));
        }

        info!(user = %user, peer = %request.peer, "Contact request accepted");

        Ok(request.peer)
    }

    /// Reject a received request or cancel a sent one
    pub async fn reject_request(&self, user: Uuid, request_id: &str) -> Result<Uuid> {
        let request = self
            .find_pending_row(user, request_id)
            .await?
            .ok_or_else(|| ContactError::not_found("Request", request_id))?;

        self.contacts
            .delete_bidirectional(user, request.peer, Some(ContactStatus::Pending))
            .await
            .map_err(|e| not_found_as(e, "Request", request_id))?;

        info!(user = %user, peer = %request.peer, "Contact request rejected");

        Ok(request.peer)
    }

    /// Remove the relation between `user` and `contact`, whatever its status
    pub async fn remove_contact(&self, user: Uuid, contact: &str) -> Result<()> {
        let peer = parse_id(contact, "contactId")
            .map_err(|_| ContactError::not_found("Contact", contact))?;

        let deleted = self
            .contacts
            .delete_bidirectional(user, peer, None)
            .await
            .map_err(|e| not_found_as(e, "Contact", contact))?;

        info!(user = %user, peer = %peer, rows = deleted, "Contact removed");

        Ok(())
    }

    /// Set or clear the caller's nickname for an accepted contact.
    ///
    /// Returns the stored nickname.
    pub async fn set_nickname(
        &self,
        user: Uuid,
        contact: &str,
        nickname: Option<&str>,
    ) -> Result<Option<String>> {
        let peer = parse_id(contact, "contactId")
            .map_err(|_| ContactError::not_found("Contact", contact))?;
        let nickname = normalize_nickname(nickname, self.config.max_nickname_len)?;

        let updated = self
            .contacts
            .set_nickname(user, peer, nickname)
            .await?
            .ok_or_else(|| ContactError::not_found("Contact", contact))?;

        debug!(user = %user, peer = %peer, "Nickname updated");

        Ok(updated.nickname)
    }

    /// The caller's pending row with the given id, if any
    async fn find_pending_row(&self, user: Uuid, request_id: &str) -> Result<Option<ContactRecord>> {
        // A malformed id cannot name an existing request
        let Ok(id) = parse_id(request_id, "requestId") else {
            return Ok(None);
        };

        Ok(self
            .contacts
            .get_contact(id)
            .await?
            .filter(|row| row.owner == user && row.status == ContactStatus::Pending))
    }

    /// Public profiles of the peers of `rows`, keyed by user id
    async fn load_profiles(&self, rows: &[ContactRecord]) -> Result<HashMap<Uuid, UserProfile>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.peer).collect();
        let users = self.users.get_users(ids).await?;

        Ok(users
            .into_iter()
            .map(|user| (user.id, user.profile()))
            .collect())
    }
}

fn not_found_as(error: StorageError, resource: &'static str, id: &str) -> ContactError {
    match error {
        StorageError::NotFound(_) => ContactError::not_found(resource, id),
        other => ContactError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::RelationStatus;
    use crate::storage::models::UserRecord;
    use crate::storage::traits::{MockContactStore, MockUserStore};
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn user(name: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            profile_pic: None,
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn manager(contacts: MockContactStore, users: MockUserStore) -> ContactManager {
        ContactManager::new(Arc::new(contacts), Arc::new(users), ContactsConfig::default())
    }

    #[tokio::test]
    async fn test_send_request_to_self_is_rejected() {
        let me = Uuid::new_v4();
        let manager = manager(MockContactStore::new(), MockUserStore::new());

        let result = manager.send_request(me, &me.to_string()).await;
        assert!(matches!(result, Err(ContactError::SelfRequest)));
    }

    #[tokio::test]
    async fn test_send_request_requires_valid_id() {
        let manager = manager(MockContactStore::new(), MockUserStore::new());

        let missing = manager.send_request(Uuid::new_v4(), "").await;
        assert!(matches!(missing, Err(ContactError::Validation(_))));

        let malformed = manager.send_request(Uuid::new_v4(), "abc").await;
        assert!(matches!(malformed, Err(ContactError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_request_to_unknown_user() {
        let mut users = MockUserStore::new();
        users.expect_get_user().returning(|_| Ok(None));

        let manager = manager(MockContactStore::new(), users);
        let result = manager
            .send_request(Uuid::new_v4(), &Uuid::new_v4().to_string())
            .await;

        assert!(matches!(
            result,
            Err(ContactError::NotFound { resource: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_send_request_refuses_blocked_peer() {
        let me = Uuid::new_v4();
        let target = user("Target");
        let target_id = target.id;

        let mut users = MockUserStore::new();
        users
            .expect_get_user()
            .with(eq(target_id))
            .returning(move |_| Ok(Some(target.clone())));

        let mut contacts = MockContactStore::new();
        contacts.expect_find_relation().returning(move |a, b| {
            Ok(Some(ContactRecord::new(
                b,
                a,
                ContactStatus::Blocked,
                b,
                Utc::now(),
            )))
        });
        contacts.expect_create_bidirectional().never();

        let manager = manager(contacts, users);
        let result = manager.send_request(me, &target_id.to_string()).await;

        assert!(matches!(
            result,
            Err(ContactError::AlreadyRelated {
                status: ContactStatus::Blocked,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_send_request_race_loser_reports_pending() {
        let target = user("Target");
        let target_id = target.id;

        let mut users = MockUserStore::new();
        users
            .expect_get_user()
            .returning(move |_| Ok(Some(target.clone())));

        let mut contacts = MockContactStore::new();
        contacts.expect_find_relation().returning(|_, _| Ok(None));
        contacts
            .expect_create_bidirectional()
            .returning(|_, _, _| Err(StorageError::AlreadyExists("contact_pair_idx".into())));

        let manager = manager(contacts, users);
        let result = manager
            .send_request(Uuid::new_v4(), &target_id.to_string())
            .await;

        assert!(matches!(
            result,
            Err(ContactError::AlreadyRelated {
                status: ContactStatus::Pending,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_accept_own_request_is_not_found() {
        let me = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let row = ContactRecord::new(me, peer, ContactStatus::Pending, me, Utc::now());
        let row_id = row.id;

        let mut contacts = MockContactStore::new();
        contacts
            .expect_get_contact()
            .with(eq(row_id))
            .returning(move |_| Ok(Some(row.clone())));
        contacts.expect_update_bidirectional_status().never();

        let manager = manager(contacts, MockUserStore::new());
        let result = manager.accept_request(me, &row_id.to_string()).await;

        assert!(matches!(
            result,
            Err(ContactError::NotFound { resource: "Request", .. })
        ));
    }

    #[tokio::test]
    async fn test_accept_request_of_other_user_is_not_found() {
        let owner = Uuid::new_v4();
        let requester = Uuid::new_v4();
        let row = ContactRecord::new(owner, requester, ContactStatus::Pending, requester, Utc::now());
        let row_id = row.id;

        let mut contacts = MockContactStore::new();
        contacts
            .expect_get_contact()
            .returning(move |_| Ok(Some(row.clone())));

        let manager = manager(contacts, MockUserStore::new());
        let intruder = Uuid::new_v4();
        let result = manager.accept_request(intruder, &row_id.to_string()).await;

        assert!(matches!(result, Err(ContactError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_accept_received_request_updates_pair() {
        let me = Uuid::new_v4();
        let requester = Uuid::new_v4();
        let row = ContactRecord::new(me, requester, ContactStatus::Pending, requester, Utc::now());
        let row_id = row.id;

        let mut contacts = MockContactStore::new();
        contacts
            .expect_get_contact()
            .returning(move |_| Ok(Some(row.clone())));
        contacts
            .expect_update_bidirectional_status()
            .with(eq(me), eq(requester), eq(ContactStatus::Accepted))
            .times(1)
            .returning(|_, _, _| Ok(2));

        let manager = manager(contacts, MockUserStore::new());
        let peer = manager.accept_request(me, &row_id.to_string()).await.unwrap();
        assert_eq!(peer, requester);
    }

    #[tokio::test]
    async fn test_accept_with_malformed_id_is_not_found() {
        let mut contacts = MockContactStore::new();
        contacts.expect_get_contact().never();

        let manager = manager(contacts, MockUserStore::new());
        let result = manager.accept_request(Uuid::new_v4(), "nope").await;
        assert!(matches!(result, Err(ContactError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reject_deletes_only_pending_rows() {
        let me = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let row = ContactRecord::new(me, peer, ContactStatus::Pending, me, Utc::now());
        let row_id = row.id;

        let mut contacts = MockContactStore::new();
        contacts
            .expect_get_contact()
            .returning(move |_| Ok(Some(row.clone())));
        contacts
            .expect_delete_bidirectional()
            .with(eq(me), eq(peer), eq(Some(ContactStatus::Pending)))
            .times(1)
            .returning(|_, _, _| Ok(2));

        let manager = manager(contacts, MockUserStore::new());
        assert_eq!(
            manager.reject_request(me, &row_id.to_string()).await.unwrap(),
            peer
        );
    }

    #[tokio::test]
    async fn test_remove_missing_contact_is_not_found() {
        let mut contacts = MockContactStore::new();
        contacts
            .expect_delete_bidirectional()
            .returning(|_, _, _| Err(StorageError::NotFound("pair".into())));

        let manager = manager(contacts, MockUserStore::new());
        let result = manager
            .remove_contact(Uuid::new_v4(), &Uuid::new_v4().to_string())
            .await;

        assert!(matches!(
            result,
            Err(ContactError::NotFound { resource: "Contact", .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_contact_propagates_store_failures() {
        let mut contacts = MockContactStore::new();
        contacts
            .expect_delete_bidirectional()
            .returning(|_, _, _| Err(StorageError::Transaction("conflict".into())));

        let manager = manager(contacts, MockUserStore::new());
        let result = manager
            .remove_contact(Uuid::new_v4(), &Uuid::new_v4().to_string())
            .await;

        assert!(matches!(result, Err(ContactError::Storage(_))));
    }

    #[tokio::test]
    async fn test_set_nickname_rejects_long_values_before_touching_store() {
        let mut contacts = MockContactStore::new();
        contacts.expect_set_nickname().never();

        let manager = manager(contacts, MockUserStore::new());
        let long = "n".repeat(51);
        let result = manager
            .set_nickname(Uuid::new_v4(), &Uuid::new_v4().to_string(), Some(&long))
            .await;

        assert!(matches!(result, Err(ContactError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_short_query() {
        let mut users = MockUserStore::new();
        users.expect_search_users().never();

        let manager = manager(MockContactStore::new(), users);
        let result = manager.search_candidates(Uuid::new_v4(), " a ").await;

        assert!(matches!(result, Err(ContactError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_annotates_relations() {
        let me = Uuid::new_v4();
        let stranger = user("Stranger");
        let friend = user("Friend");
        let friend_id = friend.id;
        let found = vec![stranger.clone(), friend.clone()];

        let mut users = MockUserStore::new();
        users
            .expect_search_users()
            .withf(move |needle, exclude, limit| needle.to_string() == "er" && *exclude == me && *limit == 20)
            .returning(move |_, _, _| Ok(found.clone()));

        let mut contacts = MockContactStore::new();
        contacts.expect_find_relation().returning(move |a, b| {
            if b == friend_id {
                Ok(Some(ContactRecord::new(a, b, ContactStatus::Pending, a, Utc::now())))
            } else {
                Ok(None)
            }
        });

        let manager = manager(contacts, users);
        let results = manager.search_candidates(me, "er").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].user.id, stranger.id);
        assert_eq!(results[0].relation_status, RelationStatus::None);
        assert!(results[0].can_add);
        assert_eq!(results[1].user.id, friend_id);
        assert_eq!(results[1].relation_status, RelationStatus::Pending);
        assert!(!results[1].can_add);
    }

    #[tokio::test]
    async fn test_list_accepted_orders_and_uses_nicknames() {
        let me = Uuid::new_v4();
        let older = user("Older");
        let newer = user("Newer");
        let now = Utc::now();

        let mut older_row = ContactRecord::new(me, older.id, ContactStatus::Accepted, me, now);
        older_row.accepted_at = Some(now - Duration::hours(2));
        let mut newer_row = ContactRecord::new(me, newer.id, ContactStatus::Accepted, me, now);
        newer_row.accepted_at = Some(now - Duration::minutes(5));
        newer_row.nickname = Some("Nuevo".to_string());

        let rows = vec![older_row, newer_row];
        let directory = vec![older.clone(), newer.clone()];

        let mut contacts = MockContactStore::new();
        contacts
            .expect_list_contacts()
            .with(eq(me), eq(ContactStatus::Accepted))
            .returning(move |_, _| Ok(rows.clone()));

        let mut users = MockUserStore::new();
        users
            .expect_get_users()
            .returning(move |_| Ok(directory.clone()));

        let manager = manager(contacts, users);
        let listed = manager.list_accepted(me).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].peer.id, newer.id);
        assert_eq!(listed[0].display_name, "Nuevo");
        assert_eq!(listed[1].peer.id, older.id);
        assert_eq!(listed[1].display_name, "Older");
        assert_eq!(listed[1].nickname, None);
    }

    #[tokio::test]
    async fn test_list_pending_splits_by_direction() {
        let me = Uuid::new_v4();
        let incoming = user("Incoming");
        let outgoing = user("Outgoing");
        let now = Utc::now();

        let received = ContactRecord::new(me, incoming.id, ContactStatus::Pending, incoming.id, now);
        let sent = ContactRecord::new(me, outgoing.id, ContactStatus::Pending, me, now);
        let received_id = received.id;
        let sent_id = sent.id;
        let rows = vec![received, sent];
        let directory = vec![incoming, outgoing];

        let mut contacts = MockContactStore::new();
        contacts
            .expect_list_contacts()
            .with(eq(me), eq(ContactStatus::Pending))
            .returning(move |_, _| Ok(rows.clone()));

        let mut users = MockUserStore::new();
        users
            .expect_get_users()
            .returning(move |_| Ok(directory.clone()));

        let manager = manager(contacts, users);
        let pending = manager.list_pending(me).await.unwrap();

        assert_eq!(pending.received.len(), 1);
        assert_eq!(pending.received[0].request_id, received_id);
        assert_eq!(pending.sent.len(), 1);
        assert_eq!(pending.sent[0].request_id, sent_id);
    }

    #[tokio::test]
    async fn test_health_without_base_store() {
        let manager = manager(MockContactStore::new(), MockUserStore::new());
        assert!(manager.health_check().await.unwrap());
    }
}
