//! Shared media record types
//!
//! A `CapturedMedia` value is produced by the capture session only after
//! the underlying device operation has fully completed, and is consumed
//! by value (exactly once) by the hand-off pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind tag for captured or posted media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// A unit of media produced by a completed capture
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedMedia {
    /// Opaque local file locator; the core never inspects file contents
    pub uri: String,

    /// Whether this is a photo or a video
    pub kind: MediaKind,

    /// When the capture completed (not persisted with feed entries)
    pub captured_at: DateTime<Utc>,
}

impl CapturedMedia {
    /// Create a photo record for a finished capture
    pub fn photo(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: MediaKind::Photo,
            captured_at: Utc::now(),
        }
    }

    /// Create a video record for a finished recording
    pub fn video(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: MediaKind::Video,
            captured_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaKind::Photo).unwrap(), "\"photo\"");
        assert_eq!(serde_json::to_string(&MediaKind::Video).unwrap(), "\"video\"");
    }

    #[test]
    fn test_kind_rejects_unknown_tag() {
        assert!(serde_json::from_str::<MediaKind>("\"gif\"").is_err());
    }
}
