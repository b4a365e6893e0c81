//! Storage abstraction for Slipstream.
//!
//! - [`local::LocalStorage`]: redb-backed preference stores (default, fully offline)
//!
//! The player holds a `Box<dyn SlipstreamStorage>` and all persistence goes
//! through it. Each method fixes the commit mode its call sites need: hot
//! paths during playback apply asynchronously, mutations made right before
//! leaving a screen commit durably.

pub mod local;

use anyhow::Result;
use async_trait::async_trait;

use crate::instances::CustomInstance;
use crate::watch_history::WatchHistoryItem;
use crate::watch_positions::WatchPosition;

/// Core storage trait for all persistent player state.
#[async_trait]
pub trait SlipstreamStorage: Send + Sync {
    /// Human-readable backend name (e.g., "local").
    fn backend_name(&self) -> &str;

    // ── Search ──────────────────────────────────────────────────────

    /// Record a submitted search query.
    async fn record_search(&self, query: &str) -> Result<()>;

    /// Get stored queries, most recent first.
    async fn get_search_history(&self) -> Result<Vec<String>>;

    /// Remove a query from history.
    async fn remove_search(&self, query: &str) -> Result<()>;

    // ── Watch history ───────────────────────────────────────────────

    /// Record a watched video.
    async fn record_watch(&self, item: WatchHistoryItem) -> Result<()>;

    /// Get watch history, oldest first.
    async fn get_watch_history(&self) -> Result<Vec<WatchHistoryItem>>;

    /// Remove the history entry for a video.
    async fn remove_watch(&self, video_id: &str) -> Result<()>;

    /// Remove the history entry at a list position.
    async fn remove_watch_at(&self, index: usize) -> Result<()>;

    // ── Resume positions ────────────────────────────────────────────

    /// Save the current playback offset. Called continuously during
    /// playback, so this must not block on disk.
    async fn save_position(&self, video_id: &str, position_millis: u64) -> Result<()>;

    /// Get all stored resume positions.
    async fn get_watch_positions(&self) -> Result<Vec<WatchPosition>>;

    /// Drop the resume position for a video.
    async fn remove_position(&self, video_id: &str) -> Result<()>;

    // ── Instances & subscriptions ───────────────────────────────────

    /// Add a user-supplied server instance.
    async fn add_instance(&self, instance: CustomInstance) -> Result<()>;

    /// Get all user-supplied instances.
    async fn get_instances(&self) -> Result<Vec<CustomInstance>>;

    /// Replace the locally tracked subscription list.
    async fn set_subscriptions(&self, channels: Vec<String>) -> Result<()>;

    /// Get the locally tracked subscription list.
    async fn get_subscriptions(&self) -> Result<Vec<String>>;

    // ── Session ─────────────────────────────────────────────────────

    /// Remember the video the player last had open.
    async fn set_last_played(&self, video_id: &str) -> Result<()>;

    /// Get the last played video id, if any.
    async fn get_last_played(&self) -> Result<Option<String>>;
}
