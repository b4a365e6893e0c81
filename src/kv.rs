//! Key-value backends for preference blobs.
//!
//! Two namespaces exist on disk: the general preference store and a
//! file-private credentials store ([`RedbStore::open_restricted`]). Every
//! write picks a [`CommitMode`]: `Apply` returns before the data reaches
//! disk, `Commit` blocks until the write is durable.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use redb::{Database, Durability, ReadableTable, TableDefinition};

const PREFS: TableDefinition<&str, &str> = TableDefinition::new("prefs");

/// How a write is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Fire-and-forget: the value is visible immediately, persisted eventually.
    Apply,
    /// Block until the value is durable on disk.
    Commit,
}

/// String-keyed blob storage. Absent keys read as `None`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str, mode: CommitMode) -> Result<()>;
    fn remove(&self, key: &str, mode: CommitMode) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Durable preference store backed by redb.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)
            .with_context(|| format!("failed to open preference store at {}", path.display()))?;
        // Ensure table exists
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(PREFS)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    /// Open a store whose backing file is readable only by the current user.
    /// This is the credentials namespace; tokens never land in the general store.
    pub fn open_restricted(path: &Path) -> Result<Self> {
        let store = Self::open(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
        }
        Ok(store)
    }

    fn durability(mode: CommitMode) -> Durability {
        match mode {
            CommitMode::Apply => Durability::Eventual,
            CommitMode::Commit => Durability::Immediate,
        }
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PREFS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn put(&self, key: &str, value: &str, mode: CommitMode) -> Result<()> {
        let mut txn = self.db.begin_write()?;
        txn.set_durability(Self::durability(mode));
        {
            let mut table = txn.open_table(PREFS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str, mode: CommitMode) -> Result<()> {
        let mut txn = self.db.begin_write()?;
        txn.set_durability(Self::durability(mode));
        {
            let mut table = txn.open_table(PREFS)?;
            let _ = table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFS)?;
            // Collect all keys then delete
            let keys: Vec<String> = table
                .iter()?
                .map(|r| r.map(|(k, _)| k.value().to_string()))
                .collect::<std::result::Result<_, _>>()?;
            for key in keys {
                let _ = table.remove(key.as_str())?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral embedding.
/// Both commit modes behave identically.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.map
            .lock()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str, _mode: CommitMode) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str, _mode: CommitMode) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("prefs.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (_dir, store) = disk_store();

        store.put("a", "one", CommitMode::Apply).unwrap();
        store.put("b", "two", CommitMode::Commit).unwrap();

        assert_eq!(store.get("a").unwrap(), Some("one".to_string()));
        assert_eq!(store.get("b").unwrap(), Some("two".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let (_dir, store) = disk_store();

        store.put("k", "old", CommitMode::Commit).unwrap();
        store.put("k", "new", CommitMode::Commit).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = disk_store();

        store.put("k", "v", CommitMode::Commit).unwrap();
        store.remove("k", CommitMode::Commit).unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing an absent key is fine
        store.remove("k", CommitMode::Apply).unwrap();
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = disk_store();

        store.put("a", "1", CommitMode::Commit).unwrap();
        store.put("b", "2", CommitMode::Commit).unwrap();
        store.clear().unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_reopen_sees_committed_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("durable", "yes", CommitMode::Commit).unwrap();
            store.put("eventual", "also", CommitMode::Apply).unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("durable").unwrap(), Some("yes".to_string()));
        assert_eq!(store.get("eventual").unwrap(), Some("also".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.redb");
        let _store = RedbStore::open_restricted(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();

        store.put("k", "v", CommitMode::Apply).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

        store.remove("k", CommitMode::Commit).unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("a", "1", CommitMode::Apply).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
