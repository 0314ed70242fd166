use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{
    AllCache, CacheError, Entry, NamedCache, SubCache, UserCache, DEFAULT_SLOT_NAME,
    DEFAULT_USER,
};
use crate::store::HostStore;

/// Addresses one slot in a host store on behalf of one user.
///
/// Nothing is cached between calls: every read deserializes the slot again,
/// and every write replaces it wholesale (read-modify-write, not atomic
/// across writers sharing the slot).
#[derive(Clone)]
pub struct StoreFront {
    store: Arc<dyn HostStore>,
    slot_name: String,
    current_user: String,
}

impl StoreFront {
    /// Address `slot_name` (or `"ls-cache"` when `None`/empty) as user `"0"`.
    pub fn new(store: Arc<dyn HostStore>, slot_name: Option<&str>) -> Self {
        let slot_name = slot_name
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SLOT_NAME);
        Self {
            store,
            slot_name: slot_name.to_string(),
            current_user: DEFAULT_USER.to_string(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = user.into();
        self
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Switch users. Caches already opened keep the user they were opened with.
    pub fn set_current_user(&mut self, user: impl Into<String>) {
        self.current_user = user.into();
    }

    pub fn store(&self) -> &Arc<dyn HostStore> {
        &self.store
    }

    /// Deserialize the whole slot. Absent or unreadable content, and content
    /// that is not a JSON object, read as an empty tree.
    pub fn read_all(&self) -> AllCache {
        let raw = match self.store.get_item(&self.slot_name) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AllCache::new(),
            Err(e) => {
                warn!(slot = %self.slot_name, error = %e, "Failed to read slot, treating as empty");
                return AllCache::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(all)) => all,
            // `null` is what an explicitly emptied slot may hold; treat it like absence.
            Ok(Value::Null) => AllCache::new(),
            Ok(_) => {
                debug!(slot = %self.slot_name, "Ignoring non-object slot content");
                AllCache::new()
            }
            Err(e) => {
                debug!(slot = %self.slot_name, error = %e, "Ignoring malformed slot content");
                AllCache::new()
            }
        }
    }

    /// The current user's sub-caches, or an empty map when the user is
    /// absent or its value is not an object.
    pub fn read_user_cache(&self) -> UserCache {
        match self.read_all().remove(&self.current_user) {
            Some(Value::Object(user_cache)) => user_cache,
            None | Some(Value::Null) => UserCache::new(),
            Some(_) => {
                debug!(
                    slot = %self.slot_name,
                    user = %self.current_user,
                    "Ignoring non-object user cache"
                );
                UserCache::new()
            }
        }
    }

    /// Entries of sub-cache `name` for the current user.
    ///
    /// Entries are decoded one at a time; a malformed entry is skipped
    /// without hiding its siblings.
    pub fn get_sub_cache(&self, name: &str) -> Option<SubCache> {
        let entries = match self.read_user_cache().remove(name)? {
            Value::Object(entries) => entries,
            Value::Null => return None,
            _ => {
                debug!(
                    slot = %self.slot_name,
                    user = %self.current_user,
                    cache = name,
                    "Ignoring non-object sub-cache"
                );
                return None;
            }
        };

        let sub_cache = entries
            .into_iter()
            .filter_map(|(entry_name, value)| match serde_json::from_value::<Entry>(value) {
                Ok(entry) => Some((entry_name, entry)),
                Err(e) => {
                    debug!(
                        slot = %self.slot_name,
                        cache = name,
                        entry = %entry_name,
                        error = %e,
                        "Skipping malformed entry"
                    );
                    None
                }
            })
            .collect();
        Some(sub_cache)
    }

    /// Open a view over sub-cache `name`, bound to this slot and the current user.
    pub fn open(&self, name: &str) -> NamedCache {
        NamedCache::new(self.clone(), name)
    }

    /// Replace sub-cache `name` for the current user and rewrite the slot.
    pub fn write_sub_cache(&self, name: &str, sub_cache: &SubCache) -> Result<(), CacheError> {
        let value = serde_json::to_value(sub_cache)?;

        let mut user_cache = self.read_user_cache();
        user_cache.insert(name.to_string(), value);

        let mut all = self.read_all();
        all.insert(self.current_user.clone(), Value::Object(user_cache));

        self.write_all(&all)
    }

    /// User ids present in the slot.
    pub fn user_names(&self) -> Vec<String> {
        self.read_all().keys().cloned().collect()
    }

    /// Sub-cache names present for the current user.
    pub fn sub_cache_names(&self) -> Vec<String> {
        self.read_user_cache().keys().cloned().collect()
    }

    /// Delete the whole slot, for every user.
    pub fn remove_slot(&self) -> Result<(), CacheError> {
        self.store.remove_item(&self.slot_name)?;
        debug!(slot = %self.slot_name, "Removed slot");
        Ok(())
    }

    fn write_all(&self, all: &AllCache) -> Result<(), CacheError> {
        let contents = serde_json::to_string(all)?;
        self.store.set_item(&self.slot_name, &contents)?;
        debug!(slot = %self.slot_name, users = all.len(), "Wrote slot");
        Ok(())
    }
}

impl fmt::Debug for StoreFront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreFront")
            .field("slot_name", &self.slot_name)
            .field("current_user", &self.current_user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use serde_json::json;

    fn front() -> (Arc<MemoryStore>, StoreFront) {
        let store = Arc::new(MemoryStore::new());
        let front = StoreFront::new(store.clone(), None);
        (store, front)
    }

    fn sub_cache(entries: &[(&str, serde_json::Value)]) -> SubCache {
        entries
            .iter()
            .map(|(name, data)| (name.to_string(), Entry::new(data.clone())))
            .collect()
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl HostStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(std::io::Error::other("storage disabled").into())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Err(std::io::Error::other("storage disabled").into())
        }
    }

    #[test]
    fn test_defaults() {
        let (_store, front) = front();
        assert_eq!(front.slot_name(), "ls-cache");
        assert_eq!(front.current_user(), "0");

        let named = StoreFront::new(Arc::new(MemoryStore::new()), Some(""));
        assert_eq!(named.slot_name(), "ls-cache");
    }

    #[test]
    fn test_read_all_empty_store() {
        let (_store, front) = front();
        assert!(front.read_all().is_empty());
        assert!(front.read_user_cache().is_empty());
        assert!(front.get_sub_cache("sessions").is_none());
    }

    #[test]
    fn test_read_all_malformed_is_empty() {
        let (store, front) = front();
        for raw in ["not json", "[1,2]", "\"text\"", "null"] {
            store.set_item("ls-cache", raw).unwrap();
            assert!(front.read_all().is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_non_object_user_reads_empty_but_keeps_slot() {
        let (store, front) = front();
        store.set_item("ls-cache", r#"{"0": 5, "bob": {"a": {}}}"#).unwrap();
        assert_eq!(front.user_names(), vec!["0", "bob"]);
        assert!(front.read_user_cache().is_empty());
        assert!(front.get_sub_cache("a").is_none());
    }

    #[test]
    fn test_write_keeps_malformed_sibling_user() {
        let (store, front) = front();
        let good = r#"{"data":1,"time":"2024-01-01T00:00:00.000Z"}"#;
        let raw = format!(r#"{{"0":{{"a":{{"k":{good}}},"b":{{"j":{good}}}}},"bob":"x"}}"#);
        store.set_item("ls-cache", &raw).unwrap();

        let mut cache = front.open("a");
        assert_eq!(cache.get("k").unwrap().data, json!(1));
        cache.put(Some("new"), &2).unwrap();

        let raw = store.get_item("ls-cache").unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["bob"], json!("x"));
        assert_eq!(value["0"]["b"]["j"]["data"], json!(1));
        assert_eq!(value["0"]["a"]["k"]["data"], json!(1));
        assert_eq!(value["0"]["a"]["new"]["data"], json!(2));
    }

    #[test]
    fn test_malformed_entry_does_not_hide_siblings() {
        let (store, front) = front();
        store
            .set_item(
                "ls-cache",
                r#"{"0":{"a":{"good":{"data":"ok","time":"2024-01-01T00:00:00.000Z"},"bad":5,"gone":null}}}"#,
            )
            .unwrap();

        let sub_cache = front.get_sub_cache("a").unwrap();
        assert_eq!(sub_cache.keys().collect::<Vec<_>>(), vec!["good"]);

        let mut cache = front.open("a");
        assert!(cache.get("good").is_some());
        cache.put(Some("new"), &2).unwrap();
        assert_eq!(cache.entry_names(), vec!["good", "new"]);
        assert_eq!(cache.get("good").unwrap().data, json!("ok"));
    }

    #[test]
    fn test_write_replaces_malformed_slot() {
        let (store, front) = front();
        store.set_item("ls-cache", "{{{").unwrap();
        front
            .write_sub_cache("sessions", &sub_cache(&[("token", json!("abc"))]))
            .unwrap();
        let sessions = front.get_sub_cache("sessions").unwrap();
        assert_eq!(sessions["token"].data, json!("abc"));
    }

    #[test]
    fn test_write_sub_cache_layout() {
        let (store, front) = front();
        front
            .write_sub_cache("sessions", &sub_cache(&[("token", json!("abc"))]))
            .unwrap();

        let raw = store.get_item("ls-cache").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["0"]["sessions"]["token"]["data"], json!("abc"));
        assert!(value["0"]["sessions"]["token"]["time"].is_string());
    }

    #[test]
    fn test_write_keeps_sibling_caches_and_users() {
        let (_store, mut front) = front();
        front
            .write_sub_cache("a", &sub_cache(&[("x", json!(1))]))
            .unwrap();
        front.set_current_user("alice");
        front
            .write_sub_cache("a", &sub_cache(&[("y", json!(2))]))
            .unwrap();
        front
            .write_sub_cache("b", &sub_cache(&[("z", json!(3))]))
            .unwrap();

        assert_eq!(front.sub_cache_names(), vec!["a", "b"]);
        assert_eq!(front.user_names(), vec!["0", "alice"]);

        front.set_current_user("0");
        let a = front.get_sub_cache("a").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a["x"].data, json!(1));
        assert!(front.get_sub_cache("b").is_none());
    }

    #[test]
    fn test_slots_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let first = StoreFront::new(store.clone(), Some("first"));
        let second = StoreFront::new(store.clone(), Some("second"));
        first
            .write_sub_cache("a", &sub_cache(&[("x", json!(1))]))
            .unwrap();
        assert!(second.get_sub_cache("a").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_null_and_malformed_sub_cache_read_as_absent() {
        let (store, front) = front();
        store
            .set_item("ls-cache", r#"{"0":{"a":null,"b":"oops","c":{}}}"#)
            .unwrap();
        assert!(front.get_sub_cache("a").is_none());
        assert!(front.get_sub_cache("b").is_none());
        assert_eq!(front.get_sub_cache("c"), Some(SubCache::new()));
    }

    #[test]
    fn test_remove_slot() {
        let (store, front) = front();
        front
            .write_sub_cache("a", &sub_cache(&[("x", json!(1))]))
            .unwrap();
        front.remove_slot().unwrap();
        assert!(store.is_empty());
        assert!(front.read_all().is_empty());
    }

    #[test]
    fn test_broken_store_reads_empty_and_fails_writes() {
        let front = StoreFront::new(Arc::new(BrokenStore), None);
        assert!(front.read_all().is_empty());
        assert!(front.get_sub_cache("a").is_none());

        let err = front.write_sub_cache("a", &SubCache::new()).unwrap_err();
        assert!(matches!(err, CacheError::Store(StoreError::Io(_))));
        assert!(front.remove_slot().is_err());
    }

    #[test]
    fn test_debug_omits_store() {
        let (_store, front) = front();
        let shown = format!("{:?}", front.with_user("bob"));
        assert!(shown.contains("ls-cache"));
        assert!(shown.contains("bob"));
    }
}
