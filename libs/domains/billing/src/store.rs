use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};

/// Key-value port for session state persistence
///
/// This trait defines the storage interface a host application supplies to
/// a calculator session. Implementations can use different backends (a
/// browser cookie jar, a state file, an in-memory map for tests). Both
/// operations are synchronous: the session issues writes fire-and-forget
/// after each mutation and never awaits completion.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Load the stored value for a key, if any
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store a value under a key, replacing any previous value
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).save(key, value)
    }
}

/// In-memory session store
///
/// Backs tests and embedded hosts that do not need durable state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.load("absent").unwrap(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.save("usage", r#"{"requests":1}"#).unwrap();
        assert_eq!(
            store.load("usage").unwrap().as_deref(),
            Some(r#"{"requests":1}"#)
        );
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.save("team", "1").unwrap();
        store.save("team", "4").unwrap();
        assert_eq!(store.load("team").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_store_usable_through_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.save("key", "value").unwrap();
        assert_eq!(store.load("key").unwrap().as_deref(), Some("value"));
    }
}
