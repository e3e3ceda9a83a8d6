//! redb-backed state store

use crate::error::StorageError;
use namity_core::{CoreError, StateStore};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use tracing::debug;

/// The single string-keyed table holding all player state
const STATE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("namity_state");

/// Embedded key/value store
///
/// One redb database file, one table. Each `put`/`remove` is its own
/// committed transaction; readers of a key see either the value before a
/// write or after it.
pub struct KvStateStore {
    db: Database,
}

impl KvStateStore {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened state store");
        Ok(Self { db })
    }

    fn put_inner(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get_inner(&self, key: &str) -> Result<Option<String>, StorageError> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(STATE_TABLE) {
            Ok(table) => table,
            // Nothing was ever written
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn remove_inner(&self, key: &str) -> Result<(), StorageError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

impl StateStore for KvStateStore {
    fn put(&self, key: &str, value: &str) -> namity_core::Result<()> {
        self.put_inner(key, value).map_err(CoreError::from)
    }

    fn get(&self, key: &str) -> namity_core::Result<Option<String>> {
        self.get_inner(key).map_err(CoreError::from)
    }

    fn remove(&self, key: &str) -> namity_core::Result<()> {
        self.remove_inner(key).map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, KvStateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStateStore::open(dir.path().join("state.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn put_get_roundtrip() {
        let (_dir, store) = open_temp();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn get_missing_key() {
        let (_dir, store) = open_temp();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn put_replaces_previous_value() {
        let (_dir, store) = open_temp();
        store.put("k", "old").unwrap();
        store.put("k", "new").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, store) = open_temp();
        store.put("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.redb");
        {
            let store = KvStateStore::open(&path).unwrap();
            store.put("k", "v").unwrap();
        }

        let store = KvStateStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
