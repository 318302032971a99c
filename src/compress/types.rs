//! Compression options and errors
//!
//! The defaults mirror what the capture flow posts with: clamp to 720 px,
//! skip sources under 3 MB, cap the bitrate at 4 Mbps if auto overshoots.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the target bitrate is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// Quality-driven encode with the bitrate ceiling as a safety cap
    Auto,
    /// Encode directly at the configured bitrate
    Manual,
}

/// Configuration for one compression run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionOptions {
    pub method: CompressionMethod,

    /// Longest output dimension in pixels; aspect ratio is preserved and
    /// sources already smaller are not upscaled
    pub max_dimension: u32,

    /// Sources smaller than this many megabytes are returned unchanged
    pub min_source_mb: u64,

    /// Bitrate ceiling in bits per second
    pub max_bitrate: u64,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            method: CompressionMethod::Auto,
            max_dimension: 720,
            min_source_mb: 3,
            max_bitrate: 4_000_000,
        }
    }
}

impl CompressionOptions {
    /// Threshold below which a source is passed through untouched
    pub fn min_source_bytes(&self) -> u64 {
        self.min_source_mb * 1024 * 1024
    }
}

/// Compression errors
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("failed to probe source: {0}")]
    Probe(String),

    #[error("compression task failed: {0}")]
    Task(String),
}
