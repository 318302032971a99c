//! Media hand-off pipeline
//!
//! Moves one `CapturedMedia` record from capture to the feed:
//! preview → (optional compression for video) → persist. Media is consumed
//! by value, so a record is posted at most once; a discarded preview is
//! simply dropped.

use crate::compress::{local_source, CompressionError, CompressionOptions, ProgressFn, VideoCompressor};
use crate::feed::{FeedStore, PostedEntry, StorageError, StorageGateway};
use crate::media::{CapturedMedia, MediaKind};
use std::sync::Arc;
use thiserror::Error;

/// Hand-off pipeline errors
#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("compression failed: {0}")]
    Compression(#[from] CompressionError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// A captured record awaiting the user's decision
///
/// Holds the media without persisting anything; dropping the preview
/// discards it.
pub struct MediaPreview {
    media: CapturedMedia,
}

impl MediaPreview {
    pub fn media(&self) -> &CapturedMedia {
        &self.media
    }

    pub fn into_media(self) -> CapturedMedia {
        self.media
    }
}

/// Sequences preview, optional compression, and feed persistence
pub struct HandoffPipeline {
    feed: FeedStore,
    compressor: Option<Arc<dyn VideoCompressor>>,
    compression: CompressionOptions,
}

impl HandoffPipeline {
    /// A pipeline that posts media as captured, with no compression stage
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self {
            feed: FeedStore::new(gateway),
            compressor: None,
            compression: CompressionOptions::default(),
        }
    }

    /// Compress video before posting (the default posting path for video)
    pub fn with_compressor(
        mut self,
        compressor: Arc<dyn VideoCompressor>,
        options: CompressionOptions,
    ) -> Self {
        self.compressor = Some(compressor);
        self.compression = options;
        self
    }

    /// Read access to the posted feed
    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    /// Hand media to the preview stage; nothing persists until `post`
    pub fn preview(&self, media: CapturedMedia) -> MediaPreview {
        MediaPreview { media }
    }

    /// Post media to the feed
    pub async fn post(&self, media: CapturedMedia) -> Result<PostedEntry, HandoffError> {
        self.post_with_progress(media, &|_| {}).await
    }

    /// Post media, forwarding compression progress for video
    ///
    /// Compression strictly precedes the storage write: if it fails,
    /// nothing is persisted, and an uncompressed entry is never written
    /// when compression was requested.
    pub async fn post_with_progress(
        &self,
        media: CapturedMedia,
        on_progress: ProgressFn<'_>,
    ) -> Result<PostedEntry, HandoffError> {
        let mut entry = PostedEntry::from(media);

        if entry.kind == MediaKind::Video {
            if let Some(compressor) = &self.compressor {
                let output = compressor
                    .compress(local_source(&entry.uri), &self.compression, on_progress)
                    .await?;
                entry.uri = output.to_string_lossy().into_owned();
            }
        }

        self.feed.prepend(entry.clone()).await?;
        tracing::info!(uri = %entry.uri, kind = ?entry.kind, "posted to feed");
        Ok(entry)
    }

    /// Delete every posted entry
    pub async fn clear_all(&self) -> Result<(), HandoffError> {
        self.feed.clear().await?;
        Ok(())
    }
}
