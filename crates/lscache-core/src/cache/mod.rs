//! Slot layout and cache views.
//!
//! One slot in the host store holds the whole tree:
//!
//! ```text
//! { [user]: { [cache name]: { [entry name]: { "data": any, "time": "<RFC 3339>" } } } }
//! ```
//!
//! - `StoreFront`: addresses one slot for one user, reads and writes whole sub-caches
//! - `NamedCache`: a view over one sub-cache with put/get/delete/clear/time_diff
//! - `Entry`, `TimeDiff`: the stored record and its age
//!
//! Every mutation rewrites the entire slot. Two writers sharing a slot can
//! overwrite each other's unrelated entries; nothing here prevents that.

pub mod entry;
pub mod error;
pub mod front;
pub mod named;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub use entry::{Entry, TimeDiff};
pub use error::CacheError;
pub use front::StoreFront;
pub use named::NamedCache;

/// Slot name used when none is given
pub const DEFAULT_SLOT_NAME: &str = "ls-cache";

/// User id used when none is given
pub const DEFAULT_USER: &str = "0";

/// Entry name used by `NamedCache::put` when the name is missing or empty
pub const DEFAULT_ENTRY_NAME: &str = "default";

/// Entries of one named sub-cache, keyed by entry name.
pub type SubCache = BTreeMap<String, Entry>;

/// One user's sub-caches. Values stay raw JSON at this level; only a
/// `NamedCache` gives them the `SubCache` shape.
pub type UserCache = Map<String, Value>;

/// The deserialized slot: every user's caches. User values stay raw JSON so
/// a rewrite carries users it cannot read back into the slot unchanged.
pub type AllCache = Map<String, Value>;
