//! Contact workflows and read-side queries.
//!
//! [`ContactManager`] is the entry point used by the HTTP layer. It validates
//! input, consults the user directory and delegates every write touching a
//! pair of rows to the atomic operations of [`crate::storage::traits::ContactStore`].

pub mod error;
pub mod manager;
pub mod types;
pub mod validation;

pub use error::ContactError;
pub use manager::ContactManager;
pub use types::{Candidate, ContactSummary, PendingRequest, PendingRequests, RelationStatus};
