//! Local playback state and history storage for the Slipstream video client.
//!
//! Small bounded collections — search history, watch history, resume
//! positions, locally tracked subscriptions, user-added instances — are
//! persisted as JSON blobs in an embedded key-value store, one blob per
//! collection. Each collection module owns its growth/dedup/eviction
//! rules; [`collections::CollectionStore`] owns the read-modify-write
//! sequencing underneath them.
//!
//! [`Preferences`] is the entry point; [`storage::SlipstreamStorage`] is
//! the async facade the player holds.

pub mod codec;
pub mod collections;
pub mod instances;
pub mod keys;
pub mod kv;
pub mod prefs;
pub mod search_history;
pub mod session;
pub mod storage;
pub mod watch_history;
pub mod watch_positions;

pub use codec::{LoadSource, Loaded};
pub use collections::CollectionStore;
pub use instances::{CustomInstance, CustomInstances, LocalSubscriptions};
pub use kv::{CommitMode, KeyValueStore, MemoryStore, RedbStore};
pub use prefs::Preferences;
pub use search_history::SearchHistory;
pub use session::{AuthStore, SessionState};
pub use watch_history::{HistoryLimit, WatchHistory, WatchHistoryItem};
pub use watch_positions::{WatchPosition, WatchPositions};
