//! In-memory state store
//!
//! For tests and sessions that should not leave state behind.

use namity_core::{CoreError, Result, StateStore};
use std::collections::HashMap;
use std::sync::Mutex;

/// Map-backed store with `StateStore` semantics
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key (test setup convenience)
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl StateStore for MemoryStateStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| CoreError::Storage("state store lock poisoned".into()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .map
            .lock()
            .map_err(|_| CoreError::Storage("state store lock poisoned".into()))?
            .get(key)
            .cloned())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| CoreError::Storage("state store lock poisoned".into()))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_store() {
        let store = MemoryStateStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn with_entry_seeds_state() {
        let store = MemoryStateStore::new().with_entry("a", "1");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
