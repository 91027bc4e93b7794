//! SurrealDB implementation of the storage traits.
//!
//! Contacts live in a single `contact` table holding both directions of every
//! relation. A unique index on `(owner, peer)` rejects a second row for the
//! same ordered pair, and every operation that touches both rows of a pair
//! runs inside one `BEGIN TRANSACTION ... COMMIT TRANSACTION` block.

pub mod base;
pub mod contact;
pub mod schema;
pub mod user;

pub use base::SurrealStore;

/// Type alias for the embedded (in-memory or RocksDB) store
pub type EmbeddedStore = SurrealStore<surrealdb::engine::local::Db>;
