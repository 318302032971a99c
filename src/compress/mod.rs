//! Video compression service
//!
//! Re-encodes recorded video into a smaller file before it is posted,
//! reporting fractional progress along the way. The default posting path
//! for video runs through here; photos never do.

pub mod ffmpeg;
pub mod types;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use ffmpeg::{local_source, FfmpegCompressor};
pub use types::{CompressionError, CompressionMethod, CompressionOptions};

/// Fractional progress callback, `0.0..=1.0`
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Send + Sync);

/// Off-thread video re-encoder
///
/// Not cancellable once started; callers await completion or error.
#[async_trait]
pub trait VideoCompressor: Send + Sync {
    /// Re-encode `source` and return the path of the smaller file
    ///
    /// Sources under the configured size threshold are returned unchanged.
    async fn compress(
        &self,
        source: &Path,
        options: &CompressionOptions,
        on_progress: ProgressFn<'_>,
    ) -> Result<PathBuf, CompressionError>;
}
