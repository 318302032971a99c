//! Feed persistence
//!
//! One ordered list of posted entries (newest first) under a single key.
//! Every mutation rewrites the whole list; entries are only prepended or
//! the list cleared, never updated in place.

use super::entry::PostedEntry;
use super::storage::{StorageError, StorageGateway};
use std::sync::Arc;

/// Storage key holding the serialized feed
pub const FEED_KEY: &str = "postedMedia";

/// Read/write access to the posted feed
pub struct FeedStore {
    gateway: Arc<dyn StorageGateway>,
}

impl FeedStore {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    /// Read the feed, newest first
    ///
    /// A missing value reads as empty. So does an unreadable one: stored
    /// data this crate cannot parse is not an error the user can act on.
    pub async fn entries(&self) -> Result<Vec<PostedEntry>, StorageError> {
        let Some(raw) = self.gateway.get(FEED_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "stored feed is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Prepend one entry and rewrite the stored list
    ///
    /// On success the entry is the first element of the next read. On
    /// failure nothing was replaced and the prior list is intact.
    pub async fn prepend(&self, entry: PostedEntry) -> Result<(), StorageError> {
        let mut entries = self.entries().await?;
        entries.insert(0, entry);
        let raw = serde_json::to_string(&entries)?;
        self.gateway.set(FEED_KEY, &raw).await
    }

    /// Delete the stored list entirely
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.gateway.remove(FEED_KEY).await
    }
}
