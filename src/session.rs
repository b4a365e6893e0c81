//! Scalar session state and account credentials.
//!
//! These are single string values, not collections: last-write-wins, no
//! eviction. Credentials live on the restricted store only.

use std::sync::Arc;

use anyhow::Result;

use crate::keys;
use crate::kv::{CommitMode, KeyValueStore};

pub struct SessionState<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> SessionState<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn set_last_played(&self, video_id: &str, mode: CommitMode) -> Result<()> {
        self.store.put(keys::LAST_PLAYED_VIDEO, video_id, mode)
    }

    pub fn last_played(&self) -> Result<Option<String>> {
        self.store.get(keys::LAST_PLAYED_VIDEO)
    }

    /// Always durable: the log must survive the crash it describes.
    pub fn save_error_log(&self, log: &str) -> Result<()> {
        self.store.put(keys::ERROR_LOG, log, CommitMode::Commit)
    }

    pub fn error_log(&self) -> Result<Option<String>> {
        self.store.get(keys::ERROR_LOG)
    }
}

/// Token and username on the restricted (file-private) store.
pub struct AuthStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> AuthStore<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.store.get(keys::AUTH_TOKEN)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.put(keys::AUTH_TOKEN, token, CommitMode::Apply)
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.store.get(keys::USERNAME)
    }

    pub fn set_username(&self, username: &str) -> Result<()> {
        self.store.put(keys::USERNAME, username, CommitMode::Apply)
    }

    /// Drop all stored credentials (logout).
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
