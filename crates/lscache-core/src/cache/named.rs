use serde::{de::DeserializeOwned, Serialize};

use super::{CacheError, Entry, StoreFront, SubCache, TimeDiff, DEFAULT_ENTRY_NAME};

/// A view over one named sub-cache of a slot.
///
/// The view owns its own copy of the slot address (store, slot name, user),
/// taken when it was opened. Reads always go back to the store and refresh
/// the local snapshot; `delete` edits the last snapshot before persisting.
#[derive(Debug, Clone)]
pub struct NamedCache {
    front: StoreFront,
    name: String,
    result: SubCache,
}

impl NamedCache {
    pub fn new(front: StoreFront, name: impl Into<String>) -> Self {
        let name = name.into();
        let result = front.get_sub_cache(&name).unwrap_or_default();
        Self { front, name, result }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot address this view writes through.
    pub fn front(&self) -> &StoreFront {
        &self.front
    }

    /// Re-read the sub-cache from the store and return it.
    pub fn result(&mut self) -> &SubCache {
        self.result = self.front.get_sub_cache(&self.name).unwrap_or_default();
        &self.result
    }

    /// The sub-cache as of the last read or write, without touching the store.
    pub fn snapshot(&self) -> &SubCache {
        &self.result
    }

    /// Store `data` under `name` stamped with the current time.
    /// A missing or empty name stores under `"default"`.
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        name: Option<&str>,
        data: &T,
    ) -> Result<(), CacheError> {
        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ENTRY_NAME);
        let data = serde_json::to_value(data)?;

        self.result();
        self.result.insert(name.to_string(), Entry::new(data));
        self.update()
    }

    pub fn get(&mut self, name: &str) -> Option<Entry> {
        self.result().get(name).cloned()
    }

    /// Typed `get`: `Ok(None)` when the entry is absent, `Err` when its
    /// payload does not decode as `T`.
    pub fn get_as<T: DeserializeOwned>(&mut self, name: &str) -> Result<Option<T>, CacheError> {
        match self.get(name) {
            Some(entry) => Ok(Some(entry.data_as()?)),
            None => Ok(None),
        }
    }

    /// Names of all entries currently stored.
    pub fn entry_names(&mut self) -> Vec<String> {
        self.result().keys().cloned().collect()
    }

    /// Remove `name` from the last snapshot and persist it.
    /// An empty name is ignored.
    pub fn delete(&mut self, name: &str) -> Result<(), CacheError> {
        if name.is_empty() {
            return Ok(());
        }
        self.result.remove(name);
        self.update()
    }

    /// Drop every entry of this sub-cache. Other sub-caches are untouched.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.result = SubCache::new();
        self.update()
    }

    /// Persist the current snapshot as-is.
    pub fn update(&self) -> Result<(), CacheError> {
        self.front.write_sub_cache(&self.name, &self.result)
    }

    /// How long ago `name` was written. `None` if the entry is absent or
    /// carries no timestamp.
    pub fn time_diff(&mut self, name: &str) -> Option<TimeDiff> {
        self.get(name)?.time_diff()
    }
}
