//! Read-modify-write engine for persisted collections.
//!
//! Every collection is one JSON blob under one key. A mutation loads the
//! whole collection, transforms it in memory, and writes the whole blob
//! back. A per-key mutex is held across that sequence, so two concurrent
//! mutations of the same collection cannot lose each other's update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{self, Loaded};
use crate::kv::{CommitMode, KeyValueStore};

pub struct CollectionStore<S: KeyValueStore> {
    store: Arc<S>,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: KeyValueStore> CollectionStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store, for scalar preferences that live beside the
    /// collection blobs.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the collection under `key`. Missing or corrupt blobs come back
    /// as an empty collection; check [`Loaded::source`] to tell which.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Loaded<T>> {
        let blob = self.store.get(key)?;
        Ok(codec::decode(key, blob))
    }

    /// Replace the collection under `key` with `items`.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T], mode: CommitMode) -> Result<()> {
        let blob = codec::encode(items)?;
        self.store.put(key, &blob, mode)
    }

    /// Load, transform, and write back the collection under `key`, holding
    /// the key's write lock for the whole sequence. If `apply` fails,
    /// nothing is written.
    pub fn update<T, F>(&self, key: &str, mode: CommitMode, apply: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Vec<T>) -> Result<Vec<T>>,
    {
        let lock = self.write_lock(key)?;
        let _guard = lock
            .lock()
            .map_err(|e| anyhow!("write lock poisoned for {key}: {e}"))?;

        let current = self.load(key)?.into_items();
        let next = apply(current)?;
        self.save(key, &next, mode)?;
        Ok(next)
    }

    fn write_lock(&self, key: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .write_locks
            .lock()
            .map_err(|e| anyhow!("lock table poisoned: {e}"))?;
        Ok(locks.entry(key.to_string()).or_default().clone())
    }
}
