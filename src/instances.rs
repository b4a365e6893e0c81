//! User-added server instances and locally tracked subscriptions.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::collections::CollectionStore;
use crate::keys;
use crate::kv::{CommitMode, KeyValueStore};

/// A user-added API server. The fields are opaque here; the network layer
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomInstance {
    pub name: String,
    pub api_url: String,
    pub frontend_url: String,
}

/// Append-only list of user-added instances. No dedup, no cap.
pub struct CustomInstances<S: KeyValueStore> {
    collections: Arc<CollectionStore<S>>,
}

impl<S: KeyValueStore> CustomInstances<S> {
    pub(crate) fn new(collections: Arc<CollectionStore<S>>) -> Self {
        Self { collections }
    }

    pub fn all(&self) -> Result<Vec<CustomInstance>> {
        Ok(self.collections.load(keys::CUSTOM_INSTANCES)?.into_items())
    }

    pub fn add(&self, instance: CustomInstance, mode: CommitMode) -> Result<()> {
        self.collections.update(
            keys::CUSTOM_INSTANCES,
            mode,
            move |mut instances: Vec<CustomInstance>| {
                instances.push(instance);
                Ok(instances)
            },
        )?;
        Ok(())
    }
}

/// Channel ids followed without a server account. Replaced as a whole list;
/// incremental edits happen in the caller.
pub struct LocalSubscriptions<S: KeyValueStore> {
    collections: Arc<CollectionStore<S>>,
}

impl<S: KeyValueStore> LocalSubscriptions<S> {
    pub(crate) fn new(collections: Arc<CollectionStore<S>>) -> Self {
        Self { collections }
    }

    pub fn all(&self) -> Result<Vec<String>> {
        Ok(self
            .collections
            .load(keys::LOCAL_SUBSCRIPTIONS)?
            .into_items())
    }

    pub fn set_all(&self, channels: &[String], mode: CommitMode) -> Result<()> {
        self.collections
            .save(keys::LOCAL_SUBSCRIPTIONS, channels, mode)
    }
}
