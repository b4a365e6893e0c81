//! Watched-video history: oldest first, one entry per video, optional cap.
//!
//! Note the ordering is the opposite of search history: new records are
//! appended at the end and eviction takes index 0. Each list is consumed by
//! its own screen, so the two conventions are kept as-is.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::collections::CollectionStore;
use crate::keys;
use crate::kv::{CommitMode, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub video_id: String,
    pub title: String,
    pub upload_date: String,
    pub uploader_name: String,
    pub uploader_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader_avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub duration_seconds: u32,
}

/// Size limit parsed from the `watch_history_size` scalar preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryLimit {
    Unlimited,
    Capped(usize),
}

impl HistoryLimit {
    /// An absent preference, the `"unlimited"` sentinel, or an unparseable
    /// value all mean no bound.
    fn from_pref(raw: Option<String>) -> Self {
        let raw = match raw {
            Some(raw) => raw,
            None => return Self::Unlimited,
        };
        let raw = raw.trim();
        if raw == keys::UNLIMITED {
            return Self::Unlimited;
        }
        match raw.parse::<usize>() {
            Ok(max) => Self::Capped(max),
            Err(_) => {
                tracing::warn!("unparseable watch history size {:?}, treating as unlimited", raw);
                Self::Unlimited
            }
        }
    }
}

pub struct WatchHistory<S: KeyValueStore> {
    collections: Arc<CollectionStore<S>>,
}

impl<S: KeyValueStore> WatchHistory<S> {
    pub(crate) fn new(collections: Arc<CollectionStore<S>>) -> Self {
        Self { collections }
    }

    /// Stored history, oldest first.
    pub fn all(&self) -> Result<Vec<WatchHistoryItem>> {
        Ok(self.collections.load(keys::WATCH_HISTORY)?.into_items())
    }

    /// The currently configured size limit.
    pub fn limit(&self) -> Result<HistoryLimit> {
        let raw = self.collections.store().get(keys::WATCH_HISTORY_SIZE)?;
        Ok(HistoryLimit::from_pref(raw))
    }

    /// Append `item`, replacing any earlier record of the same video. When a
    /// cap is configured and exceeded, the oldest record is evicted — one
    /// eviction per insertion, never more.
    pub fn record(&self, item: WatchHistoryItem, mode: CommitMode) -> Result<()> {
        let limit = self.limit()?;
        self.collections.update(
            keys::WATCH_HISTORY,
            mode,
            move |mut history: Vec<WatchHistoryItem>| {
                history.retain(|e| e.video_id != item.video_id);
                history.push(item);
                if let HistoryLimit::Capped(max) = limit {
                    if history.len() > max {
                        history.remove(0);
                    }
                }
                Ok(history)
            },
        )?;
        Ok(())
    }

    /// Remove the record for `video_id`. No-op if absent.
    pub fn remove(&self, video_id: &str, mode: CommitMode) -> Result<()> {
        self.collections.update(
            keys::WATCH_HISTORY,
            mode,
            |mut history: Vec<WatchHistoryItem>| {
                history.retain(|e| e.video_id != video_id);
                Ok(history)
            },
        )?;
        Ok(())
    }

    /// Remove the record at `index`. Out-of-range indices are an error, not
    /// a silent no-op.
    pub fn remove_at(&self, index: usize, mode: CommitMode) -> Result<()> {
        self.collections.update(
            keys::WATCH_HISTORY,
            mode,
            |mut history: Vec<WatchHistoryItem>| {
                if index >= history.len() {
                    bail!(
                        "watch history index {index} out of range for {} entries",
                        history.len()
                    );
                }
                history.remove(index);
                Ok(history)
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn watch_history() -> WatchHistory<MemoryStore> {
        WatchHistory::new(Arc::new(CollectionStore::new(Arc::new(MemoryStore::new()))))
    }

    fn item(video_id: &str, title: &str) -> WatchHistoryItem {
        WatchHistoryItem {
            video_id: video_id.to_string(),
            title: title.to_string(),
            upload_date: "2022-06-14".to_string(),
            uploader_name: "Test Channel".to_string(),
            uploader_id: "UC123".to_string(),
            uploader_avatar_url: None,
            thumbnail_url: Some("https://example.com/thumb.jpg".to_string()),
            duration_seconds: 300,
        }
    }

    fn set_limit(history: &WatchHistory<MemoryStore>, value: &str) {
        history
            .collections
            .store()
            .put(keys::WATCH_HISTORY_SIZE, value, CommitMode::Apply)
            .unwrap();
    }

    #[test]
    fn test_distinct_videos_append_in_order() {
        let history = watch_history();

        history.record(item("a", "A"), CommitMode::Apply).unwrap();
        history.record(item("b", "B"), CommitMode::Apply).unwrap();
        history.record(item("c", "C"), CommitMode::Apply).unwrap();

        let entries = history.all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].video_id, "a");
        assert_eq!(entries[2].video_id, "c");
    }

    #[test]
    fn test_rewatch_replaces_and_moves_to_end() {
        let history = watch_history();

        history.record(item("a", "old title"), CommitMode::Apply).unwrap();
        history.record(item("b", "B"), CommitMode::Apply).unwrap();
        history.record(item("a", "new title"), CommitMode::Apply).unwrap();

        let entries = history.all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].video_id, "b");
        assert_eq!(entries[1].video_id, "a");
        assert_eq!(entries[1].title, "new title");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let history = watch_history();
        set_limit(&history, "2");

        history.record(item("a", "A"), CommitMode::Apply).unwrap();
        history.record(item("b", "B"), CommitMode::Apply).unwrap();
        history.record(item("c", "C"), CommitMode::Apply).unwrap();

        let entries = history.all().unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_one_eviction_per_insertion() {
        let history = watch_history();

        // Grow past the cap while unlimited, then configure a small cap
        for id in ["a", "b", "c", "d"] {
            history.record(item(id, id), CommitMode::Apply).unwrap();
        }
        set_limit(&history, "2");

        history.record(item("e", "E"), CommitMode::Apply).unwrap();

        // Only one entry was evicted even though the list overshoots the cap
        let entries = history.all().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].video_id, "b");
    }

    #[test]
    fn test_unlimited_sentinel() {
        let history = watch_history();
        set_limit(&history, "unlimited");

        for i in 0..25 {
            history
                .record(item(&format!("v{i}"), "title"), CommitMode::Apply)
                .unwrap();
        }

        assert_eq!(history.all().unwrap().len(), 25);
        assert_eq!(history.limit().unwrap(), HistoryLimit::Unlimited);
    }

    #[test]
    fn test_limit_parsing() {
        assert_eq!(HistoryLimit::from_pref(None), HistoryLimit::Unlimited);
        assert_eq!(
            HistoryLimit::from_pref(Some("unlimited".to_string())),
            HistoryLimit::Unlimited
        );
        assert_eq!(
            HistoryLimit::from_pref(Some("50".to_string())),
            HistoryLimit::Capped(50)
        );
        assert_eq!(
            HistoryLimit::from_pref(Some(" 10 ".to_string())),
            HistoryLimit::Capped(10)
        );
        assert_eq!(
            HistoryLimit::from_pref(Some("lots".to_string())),
            HistoryLimit::Unlimited
        );
    }

    #[test]
    fn test_remove_by_id() {
        let history = watch_history();

        history.record(item("a", "A"), CommitMode::Apply).unwrap();
        history.record(item("b", "B"), CommitMode::Apply).unwrap();
        history.remove("a", CommitMode::Commit).unwrap();

        let entries = history.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].video_id, "b");

        // Absent id is a no-op
        history.remove("a", CommitMode::Commit).unwrap();
        assert_eq!(history.all().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_at() {
        let history = watch_history();

        history.record(item("a", "A"), CommitMode::Apply).unwrap();
        history.record(item("b", "B"), CommitMode::Apply).unwrap();
        history.remove_at(0, CommitMode::Commit).unwrap();

        let entries = history.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].video_id, "b");
    }

    #[test]
    fn test_remove_at_out_of_range_is_an_error() {
        let history = watch_history();
        history.record(item("a", "A"), CommitMode::Apply).unwrap();

        let result = history.remove_at(5, CommitMode::Commit);
        assert!(result.is_err());

        // And nothing was written
        assert_eq!(history.all().unwrap().len(), 1);
    }

    #[test]
    fn test_serialized_field_names_are_stable() {
        let entry = item("abc123", "Some Video");
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"videoId\":\"abc123\""));
        assert!(json.contains("\"uploadDate\""));
        assert!(json.contains("\"uploaderName\""));
        assert!(json.contains("\"durationSeconds\":300"));
        // Absent optional fields stay off the wire
        assert!(!json.contains("uploaderAvatarUrl"));
    }
}
