//! Simple key-value persistence for tokens, feature toggles and cached
//! payloads. File-backed in production, in-memory for tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Well-known storage keys.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const PUSH_TOKEN: &str = "push_token";
    pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
    pub const LOCATION_ENABLED: &str = "location_enabled";
    pub const CACHED_WEATHER: &str = "cached_weather";
    pub const CACHED_FORECAST: &str = "cached_forecast";
}

/// Shared key-value storage. Writes complete before returning so state
/// transitions can be sequenced after them. No transactional guarantees
/// across keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Convenience accessors for JSON-serialized boolean flags.
pub trait KeyValueStoreExt: KeyValueStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.set(key, &serde_json::to_string(&value)?)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

/// File-backed store: a single JSON object under the config directory.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open or create the store file in the given directory.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let path = dir.join("store.json");

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };

        Ok(Self { path, entries: Mutex::new(entries) })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Drop cached weather/forecast blobs, leaving tokens and flags alone.
pub fn clear_cached_data(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(keys::CACHED_WEATHER)?;
    store.remove(keys::CACHED_FORECAST)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("access_token").unwrap(), None);

        store.set("access_token", "abc").unwrap();
        assert_eq!(store.get("access_token").unwrap().as_deref(), Some("abc"));

        store.remove("access_token").unwrap();
        assert_eq!(store.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("nothing_here").is_ok());
    }

    #[test]
    fn test_bool_flags_are_json_serialized() {
        let store = MemoryStore::new();
        store.set_bool(keys::NOTIFICATIONS_ENABLED, true).unwrap();
        assert_eq!(
            store.get(keys::NOTIFICATIONS_ENABLED).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(store.get_bool(keys::NOTIFICATIONS_ENABLED).unwrap(), Some(true));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("access_token", "persisted").unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_clear_cached_data_leaves_token() {
        let store = MemoryStore::new();
        store.set(keys::ACCESS_TOKEN, "abc").unwrap();
        store.set(keys::CACHED_WEATHER, "{}").unwrap();
        store.set(keys::CACHED_FORECAST, "{}").unwrap();

        clear_cached_data(&store).unwrap();

        assert_eq!(store.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get(keys::CACHED_WEATHER).unwrap(), None);
        assert_eq!(store.get(keys::CACHED_FORECAST).unwrap(), None);
    }
}
