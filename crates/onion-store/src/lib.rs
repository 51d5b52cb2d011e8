//! # Onion Store
//!
//! State abstraction for Onion. Provides an ordered key-value interface with
//! SQLite and in-memory implementations, plus scratch branches.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The trait for all state access
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Branch`] - A discardable write overlay on another store
//!
//! ## Usage
//!
//! ```rust
//! use onion_store::{Branch, KvStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let mut branch = Branch::new(&mut store);
//! branch.set(b"key", b"value").unwrap();
//! branch.discard();
//! assert!(store.get(b"key").unwrap().is_none());
//! ```
//!
//! ## Design Notes
//!
//! - **Ordered keys**: prefix scans return entries sorted by raw key bytes
//! - **Atomic commits**: a branch commit is one batch; SQLite applies it in a transaction
//! - **Implicit discard**: a branch that is dropped without commit leaves no trace

pub mod branch;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use branch::Branch;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    decode_record, encode_record, prefix_end, prefixed_key, KvStore, StoreExt, WriteBatch,
};
