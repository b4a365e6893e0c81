//! JSON codec for stored collections.
//!
//! Collections are stored as JSON array blobs. Decoding is fail-open: a
//! missing or corrupt blob yields an empty collection instead of an error,
//! so broken local state never blocks the player. [`LoadSource`] still
//! tells callers which case they hit.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Where a loaded collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored under the key.
    Absent,
    /// Blob decoded cleanly.
    Decoded,
    /// Blob present but malformed; its contents were dropped.
    Corrupt,
}

/// A decoded collection plus its provenance.
#[derive(Debug)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub source: LoadSource,
}

impl<T> Loaded<T> {
    fn empty(source: LoadSource) -> Self {
        Self {
            items: Vec::new(),
            source,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

pub fn encode<T: Serialize>(items: &[T]) -> Result<String> {
    serde_json::to_string(items).context("failed to encode collection")
}

pub fn decode<T: DeserializeOwned>(key: &str, blob: Option<String>) -> Loaded<T> {
    let raw = match blob {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Loaded::empty(LoadSource::Absent),
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Loaded {
            items,
            source: LoadSource::Decoded,
        },
        Err(e) => {
            tracing::warn!("collection {} is corrupt, starting empty: {}", key, e);
            Loaded::empty(LoadSource::Corrupt)
        }
    }
}
