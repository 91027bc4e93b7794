//! Errors raised by contact workflows

use uuid::Uuid;

use crate::storage::errors::StorageError;
use crate::storage::models::ContactStatus;

/// Error type for contact operations
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A user tried to add themselves
    #[error("Cannot send a contact request to yourself")]
    SelfRequest,

    /// Target user, request or contact does not exist (or is not visible to the caller)
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// A relation between the two users already exists
    #[error("A {status} relation with user {peer} already exists")]
    AlreadyRelated { peer: Uuid, status: ContactStatus },

    /// Underlying store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ContactError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ContactError::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Result type for contact operations
pub type Result<T> = std::result::Result<T, ContactError>;
