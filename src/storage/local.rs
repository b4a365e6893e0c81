//! Local storage backend — wraps the redb preference stores.
//!
//! The async trait methods just call through; serialization per collection
//! key already happens inside the engine, so no extra locking is needed.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use super::SlipstreamStorage;
use crate::instances::CustomInstance;
use crate::kv::{CommitMode, RedbStore};
use crate::prefs::Preferences;
use crate::watch_history::WatchHistoryItem;
use crate::watch_positions::WatchPosition;

pub struct LocalStorage {
    prefs: Preferences<RedbStore>,
}

impl LocalStorage {
    /// Open the default on-disk stores.
    pub fn new() -> Result<Self> {
        Ok(Self {
            prefs: Preferences::open_default()?,
        })
    }

    /// Open stores under an explicit directory.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            prefs: Preferences::open(data_dir)?,
        })
    }

    /// Direct access for state not covered by the trait (error log,
    /// credentials, raw key removal).
    pub fn prefs(&self) -> &Preferences<RedbStore> {
        &self.prefs
    }
}

#[async_trait]
impl SlipstreamStorage for LocalStorage {
    fn backend_name(&self) -> &str {
        "local"
    }

    async fn record_search(&self, query: &str) -> Result<()> {
        self.prefs.search_history().record(query, CommitMode::Apply)
    }

    async fn get_search_history(&self) -> Result<Vec<String>> {
        self.prefs.search_history().all()
    }

    async fn remove_search(&self, query: &str) -> Result<()> {
        self.prefs.search_history().remove(query, CommitMode::Commit)
    }

    async fn record_watch(&self, item: WatchHistoryItem) -> Result<()> {
        self.prefs.watch_history().record(item, CommitMode::Apply)
    }

    async fn get_watch_history(&self) -> Result<Vec<WatchHistoryItem>> {
        self.prefs.watch_history().all()
    }

    async fn remove_watch(&self, video_id: &str) -> Result<()> {
        self.prefs.watch_history().remove(video_id, CommitMode::Commit)
    }

    async fn remove_watch_at(&self, index: usize) -> Result<()> {
        self.prefs.watch_history().remove_at(index, CommitMode::Commit)
    }

    async fn save_position(&self, video_id: &str, position_millis: u64) -> Result<()> {
        self.prefs
            .watch_positions()
            .save(video_id, position_millis, CommitMode::Apply)
    }

    async fn get_watch_positions(&self) -> Result<Vec<WatchPosition>> {
        self.prefs.watch_positions().all()
    }

    async fn remove_position(&self, video_id: &str) -> Result<()> {
        self.prefs
            .watch_positions()
            .remove(video_id, CommitMode::Commit)
    }

    async fn add_instance(&self, instance: CustomInstance) -> Result<()> {
        self.prefs
            .custom_instances()
            .add(instance, CommitMode::Commit)
    }

    async fn get_instances(&self) -> Result<Vec<CustomInstance>> {
        self.prefs.custom_instances().all()
    }

    async fn set_subscriptions(&self, channels: Vec<String>) -> Result<()> {
        self.prefs
            .local_subscriptions()
            .set_all(&channels, CommitMode::Commit)
    }

    async fn get_subscriptions(&self) -> Result<Vec<String>> {
        self.prefs.local_subscriptions().all()
    }

    async fn set_last_played(&self, video_id: &str) -> Result<()> {
        self.prefs.session().set_last_played(video_id, CommitMode::Apply)
    }

    async fn get_last_played(&self) -> Result<Option<String>> {
        self.prefs.session().last_played()
    }
}
