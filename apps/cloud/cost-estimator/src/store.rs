//! File-backed session store
//!
//! Persists every calculator session into one JSON object of string
//! values: flat keys, opaque string payloads. The whole file is rewritten
//! on each save, which is fine at this size.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use domain_billing::{SessionStore, StoreError, StoreResult};
use tracing::{debug, warn};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> StoreResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            // A store that has never been written to is empty, not broken
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(error) => Err(StoreError::Io(error)),
        }
    }

    fn write_all(&self, values: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let mut values = self.read_all()?;
        let value = values.remove(key);
        debug!(key, found = value.is_some(), "loaded session key");
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            // A corrupt file would block every save from then on; drop its
            // contents and rebuild the store from this write
            Err(StoreError::Malformed(error)) => {
                warn!(path = %self.path.display(), %error, "discarding corrupt state file");
                HashMap::new()
            }
            Err(error) => return Err(error),
        };
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("state.json"))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load("cloudflare_usage").unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("vercel_team_members", "3").unwrap();
        assert_eq!(
            store.load("vercel_team_members").unwrap().as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("cloudflare_usage", "{}").unwrap();
        store.save("vercel_usage", "{}").unwrap();

        assert!(store.load("cloudflare_usage").unwrap().is_some());
        assert!(store.load("vercel_usage").unwrap().is_some());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested/dir/state.json"));
        store.save("cloudflare_usage", "{}").unwrap();
        assert!(store.load("cloudflare_usage").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_file_surfaces_as_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.load("anything"),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_save_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not valid json").unwrap();

        let store = FileStore::new(&path);
        store
            .save("cloudflare_usage", "{\"worker_requests\":42000000.0}")
            .unwrap();
        assert_eq!(
            store.load("cloudflare_usage").unwrap().as_deref(),
            Some("{\"worker_requests\":42000000.0}")
        );
    }

    #[test]
    fn test_two_stores_share_one_file() {
        let dir = TempDir::new().unwrap();
        let first = store_in(&dir);
        let second = store_in(&dir);

        first
            .save("cloudflare_usage", "{\"worker_requests\":1.0}")
            .unwrap();
        assert!(second.load("cloudflare_usage").unwrap().is_some());
    }
}
