//! Key/value storage areas that hold the persisted session.
//!
//! Two areas are used side by side:
//! - a **durable** area ([`FileStore`]) that survives restarts
//! - a **session-scoped** area ([`MemoryStore`]) that lives as long as the process
//!
//! Both implement [`KeyValueStore`], a string-to-string contract modeled on
//! browser storage.
//!
//! ## Example
//!
//! ```no_run
//! use laec::storage::{FileStore, KeyValueStore, MemoryStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let durable = FileStore::open("/tmp/laec/storage.json")?;
//!     durable.set("remember_me", "true")?;
//!
//!     let session = MemoryStore::new();
//!     session.set("auth_token", "header.claims.signature")?;
//!     assert_eq!(session.get("auth_token").as_deref(), Some("header.claims.signature"));
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// A string key/value storage area.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}
