use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{HostStore, StoreError};

/// Directory name used under the platform data directory
const APP_NAME: &str = "lscache";

/// Disk-backed store: each key is one `<key>.json` file in `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the store in `<data dir>/lscache`, falling back to `./lscache`
    /// when the platform has no data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::new(Self::default_dir())
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(APP_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rejected = key.is_empty()
            || key.starts_with('.')
            || key.contains(&['/', '\\', '\0'][..]);
        if rejected {
            return Err(StoreError::invalid_key(key));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl HostStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.item_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        std::fs::write(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote store item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
