//! Core library for lscache - host store, slot layout, named caches.
//!
//! A single key in a string key-value store (the *slot*) holds a JSON tree
//! of the shape `user -> cache name -> entry name -> {data, time}`.
//! [`StoreFront`] addresses one slot for one user, and [`NamedCache`] is a
//! view over one named sub-cache inside it.
//!
//! ```
//! use std::sync::Arc;
//! use lscache_core::{MemoryStore, StoreFront};
//!
//! let front = StoreFront::new(Arc::new(MemoryStore::new()), None);
//! let mut sessions = front.open("sessions");
//! sessions.put(Some("token"), &"abc123").unwrap();
//! assert_eq!(sessions.get("token").unwrap().data, "abc123");
//! ```

pub mod cache;
pub mod store;
pub mod utils;

pub use cache::{
    AllCache, CacheError, Entry, NamedCache, StoreFront, SubCache, TimeDiff, UserCache,
    DEFAULT_ENTRY_NAME, DEFAULT_SLOT_NAME, DEFAULT_USER,
};
pub use store::{FileStore, HostStore, MemoryStore, StoreError};
