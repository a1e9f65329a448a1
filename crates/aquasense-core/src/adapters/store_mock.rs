//! In-memory client storage for testing.

use crate::adapters::store::KeyValueStore;
use crate::error::{AquaError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory key/value store.
///
/// Clones share the same storage, so a test can keep a handle while the
/// workflow owns another.
///
/// # Examples
///
/// ```
/// use aquasense_core::adapters::store::KeyValueStore;
/// use aquasense_core::adapters::store_mock::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.set("token", "abc").unwrap();
/// assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored values (key -> value)
    values: Arc<Mutex<HashMap<String, String>>>,
    /// Keys whose writes fail, for exercising error paths
    failing_writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `values`.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.lock().unwrap();
            for (key, value) in values {
                map.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Makes every later write to `key` fail with `AquaError::StorageWrite`.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.lock().unwrap().push(key.to_string());
    }

    /// Returns a copy of all stored values.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().unwrap().clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing_writes.lock().unwrap().iter().any(|k| k == key) {
            return Err(AquaError::StorageWrite(format!("{key}: quota exceeded")));
        }

        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("user", "{}").unwrap();
        assert_eq!(handle.get("user").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_with_values_and_remove() {
        let store = MemoryStore::with_values([("token", "t"), ("user", "{}")]);
        store.remove("token").unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("user"));
    }

    #[test]
    fn test_failing_writes() {
        let store = MemoryStore::new();
        store.fail_writes_to("predictedUsage");

        assert!(store.set("predictedUsage", "1").is_err());
        assert!(store.set("token", "t").is_ok());
    }
}
