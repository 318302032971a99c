//! Posted feed entries
//!
//! The on-device shape is `{"uri": "...", "type": "photo" | "video"}`,
//! stored as one JSON array under a single key. The kind tag rides in a
//! field named `type`; unknown tags fail deserialization and the whole
//! stored value then reads as empty (see `FeedStore`).

use crate::media::{CapturedMedia, MediaKind};
use serde::{Deserialize, Serialize};

/// One entry in the posted feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedEntry {
    /// Opaque local file locator
    pub uri: String,

    /// Kind tag, serialized under the field name `type`
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

impl PostedEntry {
    pub fn new(uri: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }
}

impl From<CapturedMedia> for PostedEntry {
    fn from(media: CapturedMedia) -> Self {
        Self {
            uri: media.uri,
            kind: media.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_device_shape() {
        let entry = PostedEntry::new("/media/clip.mp4", MediaKind::Video);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"uri": "/media/clip.mp4", "type": "video"})
        );
    }

    #[test]
    fn test_round_trip_preserves_order_and_kinds() {
        let entries: Vec<PostedEntry> = (0..5)
            .map(|i| {
                let kind = if i % 2 == 0 { MediaKind::Photo } else { MediaKind::Video };
                PostedEntry::new(format!("/media/item-{i}"), kind)
            })
            .collect();

        let raw = serde_json::to_string(&entries).unwrap();
        let restored: Vec<PostedEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, entries);
    }

    #[test]
    fn test_captured_media_converts_without_timestamp() {
        let media = CapturedMedia::photo("/media/shot.jpg");
        let entry = PostedEntry::from(media);
        assert_eq!(entry, PostedEntry::new("/media/shot.jpg", MediaKind::Photo));
    }
}
