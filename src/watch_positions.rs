//! Per-video resume positions, keyed uniquely by video id.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::collections::CollectionStore;
use crate::keys;
use crate::kv::{CommitMode, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchPosition {
    pub video_id: String,
    pub position_millis: u64,
}

/// Last known playback offset per video. Grows without bound; entries only
/// leave via [`WatchPositions::remove`].
pub struct WatchPositions<S: KeyValueStore> {
    collections: Arc<CollectionStore<S>>,
}

impl<S: KeyValueStore> WatchPositions<S> {
    pub(crate) fn new(collections: Arc<CollectionStore<S>>) -> Self {
        Self { collections }
    }

    pub fn all(&self) -> Result<Vec<WatchPosition>> {
        Ok(self.collections.load(keys::WATCH_POSITIONS)?.into_items())
    }

    /// Upsert the position for `video_id`; the newest write wins.
    pub fn save(&self, video_id: &str, position_millis: u64, mode: CommitMode) -> Result<()> {
        self.collections.update(
            keys::WATCH_POSITIONS,
            mode,
            |mut positions: Vec<WatchPosition>| {
                positions.retain(|p| p.video_id != video_id);
                positions.push(WatchPosition {
                    video_id: video_id.to_string(),
                    position_millis,
                });
                Ok(positions)
            },
        )?;
        Ok(())
    }

    /// Remove the position for `video_id`. No-op if absent.
    pub fn remove(&self, video_id: &str, mode: CommitMode) -> Result<()> {
        self.collections.update(
            keys::WATCH_POSITIONS,
            mode,
            |mut positions: Vec<WatchPosition>| {
                positions.retain(|p| p.video_id != video_id);
                Ok(positions)
            },
        )?;
        Ok(())
    }
}
