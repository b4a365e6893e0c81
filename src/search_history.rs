//! Search query history: most-recent-first, deduplicated, capped.

use std::sync::Arc;

use anyhow::Result;

use crate::collections::CollectionStore;
use crate::keys;
use crate::kv::{CommitMode, KeyValueStore};

/// Queries kept before the oldest falls off.
const MAX_ENTRIES: usize = 10;

pub struct SearchHistory<S: KeyValueStore> {
    collections: Arc<CollectionStore<S>>,
}

impl<S: KeyValueStore> SearchHistory<S> {
    pub(crate) fn new(collections: Arc<CollectionStore<S>>) -> Self {
        Self { collections }
    }

    /// Stored queries, most recent first.
    pub fn all(&self) -> Result<Vec<String>> {
        Ok(self.collections.load(keys::SEARCH_HISTORY)?.into_items())
    }

    /// Put `query` at the front, dropping any older occurrence of the same
    /// string. Once the list is longer than the cap, the oldest entry falls
    /// off. Empty queries are stored as-is; validation is the caller's job.
    pub fn record(&self, query: &str, mode: CommitMode) -> Result<()> {
        self.collections
            .update(keys::SEARCH_HISTORY, mode, |mut queries: Vec<String>| {
                queries.retain(|q| q != query);
                queries.insert(0, query.to_string());
                if queries.len() > MAX_ENTRIES {
                    queries.pop();
                }
                Ok(queries)
            })?;
        Ok(())
    }

    /// Remove every occurrence of `query`. No-op if absent.
    pub fn remove(&self, query: &str, mode: CommitMode) -> Result<()> {
        self.collections
            .update(keys::SEARCH_HISTORY, mode, |mut queries: Vec<String>| {
                queries.retain(|q| q != query);
                Ok(queries)
            })?;
        Ok(())
    }
}
