//! Command-line configuration.
//!
//! Settings are layered: config file, then environment (`.env` included),
//! then command-line flags. The config file lives at
//! `~/.config/lscache/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "lscache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_SLOT: &str = "LSCACHE_SLOT";
pub const ENV_USER: &str = "LSCACHE_USER";
pub const ENV_DIR: &str = "LSCACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub slot_name: Option<String>,
    pub user: Option<String>,
    pub store_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Overlay values read through `lookup` (normally `std::env::var`).
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if let Some(slot) = get(ENV_SLOT) {
            self.slot_name = Some(slot);
        }
        if let Some(user) = get(ENV_USER) {
            self.user = Some(user);
        }
        if let Some(dir) = get(ENV_DIR) {
            self.store_dir = Some(PathBuf::from(dir));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            slot_name: Some("app".to_string()),
            user: Some("42".to_string()),
            store_dir: Some(PathBuf::from("/tmp/store")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"user":"7"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.user.as_deref(), Some("7"));
        assert_eq!(config.slot_name, None);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_apply_env_overrides_and_skips_empty() {
        let env: HashMap<&str, &str> = [(ENV_SLOT, "from-env"), (ENV_USER, "")].into();
        let mut config = Config {
            slot_name: Some("from-file".to_string()),
            user: Some("file-user".to_string()),
            store_dir: None,
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.slot_name.as_deref(), Some("from-env"));
        assert_eq!(config.user.as_deref(), Some("file-user"));
        assert_eq!(config.store_dir, None);
    }
}
