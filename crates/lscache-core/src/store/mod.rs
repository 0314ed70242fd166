//! Host key-value storage.
//!
//! The cache layer only needs a synchronous, string-keyed get/set primitive,
//! the way a browser's `localStorage` behaves. This module provides:
//! - `HostStore`: the primitive itself
//! - `MemoryStore`: a process-local store, used in tests and embedding
//! - `FileStore`: one JSON file per key in a directory on disk

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string key-value storage shared by every cache view of a slot.
///
/// Each call is atomic on its own; nothing spans calls.
pub trait HostStore: Send + Sync {
    /// Return the last value stored under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}
