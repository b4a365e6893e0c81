//! Preference key names.
//!
//! These strings are the persisted wire contract: existing installs have
//! blobs stored under them, so renaming any key is a breaking change.

pub const SEARCH_HISTORY: &str = "search_history";
pub const WATCH_HISTORY: &str = "watch_history";
pub const WATCH_POSITIONS: &str = "watch_positions";
pub const CUSTOM_INSTANCES: &str = "customInstances";
pub const LOCAL_SUBSCRIPTIONS: &str = "local_subscriptions";

/// Scalar: maximum watch history length, or [`UNLIMITED`].
pub const WATCH_HISTORY_SIZE: &str = "watch_history_size";
/// Scalar: id of the most recently played video.
pub const LAST_PLAYED_VIDEO: &str = "last_stream_video_id";
/// Scalar: text of the most recent crash/error report.
pub const ERROR_LOG: &str = "error_log";

// Credentials namespace (restricted store)
pub const AUTH_TOKEN: &str = "token";
pub const USERNAME: &str = "username";

/// Sentinel value of [`WATCH_HISTORY_SIZE`] meaning no bound.
pub const UNLIMITED: &str = "unlimited";
