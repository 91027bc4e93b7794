//! # Contactbook
//!
//! Bidirectional contact relationships between application users, stored as
//! mirrored rows in SurrealDB.
//!
//! Every relation between two users is kept as two directed `contact` rows,
//! one per owner. The rows share their status and initiator while each side
//! keeps its own nickname for the other. All writes touching a pair run inside
//! a single database transaction, so a relation is never visible from only
//! one side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contactbook::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let config = ConfigBuilder::new().with_memory_storage().build()?;
//! let contacts = contactbook::init(config).await?;
//!
//! let alice = contacts
//!     .users()
//!     .create_user(NewUser::new("Alice Doe", "alice@example.com", "hash"))
//!     .await?;
//! let bob = contacts
//!     .users()
//!     .create_user(NewUser::new("Bob Roe", "bob@example.com", "hash"))
//!     .await?;
//!
//! contacts.send_request(alice.id, &bob.id.to_string()).await?;
//! let pending = contacts.list_pending(bob.id).await?;
//! assert_eq!(pending.received.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod contacts;
pub mod logging;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::init;

    pub use crate::config::{ConfigBuilder, ContactbookConfig, LogLevel};

    pub use crate::contacts::{
        Candidate, ContactError, ContactManager, ContactSummary, PendingRequest, PendingRequests,
        RelationStatus,
    };

    pub use crate::storage::{
        StorageError,
        models::{ContactRecord, ContactStatus, NewUser, UserProfile, UserRecord},
        traits::{ContactStore, UserStore},
    };

    pub use crate::{ContactbookError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level error type for contactbook initialization and operations
#[derive(Debug, thiserror::Error)]
pub enum ContactbookError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Contact workflow error
    #[error(transparent)]
    Contact(#[from] contacts::ContactError),
}

/// Result type for contactbook operations
pub type Result<T> = std::result::Result<T, ContactbookError>;

/// Initialize contactbook with the provided configuration
///
/// Sets up logging, opens the configured SurrealDB store, applies the schema
/// and returns a [`contacts::ContactManager`] wired to it.
pub async fn init(config: config::ContactbookConfig) -> Result<contacts::ContactManager> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let store = storage::create_store(&config.storage).await?;
    let store = std::sync::Arc::new(store);

    Ok(contacts::ContactManager::from_store(
        store,
        config.contacts.clone(),
    ))
}
