//! Trait definitions for storage components

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use crate::storage::errors::StorageError;
use crate::storage::models::{ContactRecord, ContactStatus, NewUser, UserRecord};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Mirrored contact relations.
///
/// Every relation between two users exists as exactly two rows, one owned by
/// each side. Implementations must apply the `*_bidirectional` operations
/// atomically: either both rows change or neither does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync + 'static + Debug {
    /// Row from either direction between `a` and `b`, whatever its status
    async fn find_relation(&self, a: Uuid, b: Uuid) -> Result<Option<ContactRecord>, StorageError>;

    /// A single row by its id
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, StorageError>;

    /// Rows owned by `owner` with the given status
    async fn list_contacts(
        &self,
        owner: Uuid,
        status: ContactStatus,
    ) -> Result<Vec<ContactRecord>, StorageError>;

    /// Insert `(requester -> target)` and `(target -> requester)` in one transaction.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when either row collides
    /// with an existing one; nothing is written in that case.
    async fn create_bidirectional(
        &self,
        requester: Uuid,
        target: Uuid,
        status: ContactStatus,
    ) -> Result<(ContactRecord, ContactRecord), StorageError>;

    /// Move both rows of the pair to `status` in one transaction.
    ///
    /// Returns the number of rows changed. Rows already in `status` are left
    /// untouched, so repeating a call changes nothing and returns 0.
    async fn update_bidirectional_status(
        &self,
        a: Uuid,
        b: Uuid,
        status: ContactStatus,
    ) -> Result<usize, StorageError>;

    /// Delete both rows of the pair in one transaction, optionally only those
    /// in `status`.
    ///
    /// Returns the number of rows deleted, or [`StorageError::NotFound`] when
    /// there was nothing to delete.
    async fn delete_bidirectional(
        &self,
        a: Uuid,
        b: Uuid,
        status: Option<ContactStatus>,
    ) -> Result<usize, StorageError>;

    /// Set or clear the nickname on the owner's accepted row only
    async fn set_nickname(
        &self,
        owner: Uuid,
        peer: Uuid,
        nickname: Option<String>,
    ) -> Result<Option<ContactRecord>, StorageError>;
}

/// User directory used to resolve identities and search candidates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync + 'static + Debug {
    /// Register a user; duplicate emails fail with [`StorageError::AlreadyExists`]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StorageError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StorageError>;

    /// Fetch several users at once; missing ids are skipped
    async fn get_users(&self, ids: Vec<Uuid>) -> Result<Vec<UserRecord>, StorageError>;

    /// Case-insensitive lookup by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Case-insensitive substring match on name or email, excluding `exclude`
    async fn search_users(
        &self,
        needle: &str,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StorageError>;
}
