//! The aggregate preference store.
//!
//! One [`Preferences`] value owns both namespaces and every collection
//! policy. It is constructed once ([`Preferences::open_default`] is the
//! single initialization point for the on-disk stores) and passed by
//! reference or `Arc` to whatever needs persistence — there is no global
//! state in this crate.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::collections::CollectionStore;
use crate::instances::{CustomInstances, LocalSubscriptions};
use crate::kv::{CommitMode, KeyValueStore, RedbStore};
use crate::search_history::SearchHistory;
use crate::session::{AuthStore, SessionState};
use crate::watch_history::WatchHistory;
use crate::watch_positions::WatchPositions;

pub(crate) const PREFS_FILE_NAME: &str = "prefs.redb";
const AUTH_FILE_NAME: &str = "auth.redb";

pub struct Preferences<S: KeyValueStore> {
    store: Arc<S>,
    search_history: SearchHistory<S>,
    watch_history: WatchHistory<S>,
    watch_positions: WatchPositions<S>,
    custom_instances: CustomInstances<S>,
    local_subscriptions: LocalSubscriptions<S>,
    session: SessionState<S>,
    auth: AuthStore<S>,
}

impl Preferences<RedbStore> {
    /// Open the on-disk stores under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("could not determine data directory")?
            .join("slipstream");
        std::fs::create_dir_all(&data_dir).context("could not create data directory")?;
        Self::open(&data_dir)
    }

    /// Open `prefs.redb` and the file-private `auth.redb` under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let general = RedbStore::open(&data_dir.join(PREFS_FILE_NAME))?;
        let auth = RedbStore::open_restricted(&data_dir.join(AUTH_FILE_NAME))?;
        Ok(Self::with_stores(Arc::new(general), Arc::new(auth)))
    }
}

impl<S: KeyValueStore> Preferences<S> {
    /// Build from explicit backends. Tests inject [`crate::kv::MemoryStore`].
    pub fn with_stores(general: Arc<S>, auth: Arc<S>) -> Self {
        let collections = Arc::new(CollectionStore::new(general.clone()));
        Self {
            search_history: SearchHistory::new(collections.clone()),
            watch_history: WatchHistory::new(collections.clone()),
            watch_positions: WatchPositions::new(collections.clone()),
            custom_instances: CustomInstances::new(collections.clone()),
            local_subscriptions: LocalSubscriptions::new(collections),
            session: SessionState::new(general.clone()),
            auth: AuthStore::new(auth),
            store: general,
        }
    }

    pub fn search_history(&self) -> &SearchHistory<S> {
        &self.search_history
    }

    pub fn watch_history(&self) -> &WatchHistory<S> {
        &self.watch_history
    }

    pub fn watch_positions(&self) -> &WatchPositions<S> {
        &self.watch_positions
    }

    pub fn custom_instances(&self) -> &CustomInstances<S> {
        &self.custom_instances
    }

    pub fn local_subscriptions(&self) -> &LocalSubscriptions<S> {
        &self.local_subscriptions
    }

    pub fn session(&self) -> &SessionState<S> {
        &self.session
    }

    pub fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    /// Remove a single key from the general namespace.
    pub fn remove(&self, key: &str, mode: CommitMode) -> Result<()> {
        self.store.remove(key, mode)
    }

    /// Clear the general namespace. Credentials are untouched.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
