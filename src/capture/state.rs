//! Capture session state
//!
//! Defines the recording state machine data and the settings the single
//! capture control operates under.

use crate::camera::{Flash, Lens};
use crate::media::CapturedMedia;
use serde::{Deserialize, Serialize};

/// Current state of the capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    Idle,
    /// Currently recording video
    Recording,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// What the capture control does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// One photo per press
    Photo,
    /// First press starts a recording, the next stops it
    Video,
}

impl Default for CaptureMode {
    fn default() -> Self {
        Self::Photo
    }
}

/// Device-facing settings applied to every subsequent capture operation
///
/// Orthogonal to [`RecordingState`]; changing flash or lens never affects
/// a recording already in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSettings {
    pub mode: CaptureMode,
    pub flash: Flash,
    pub lens: Lens,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Photo,
            flash: Flash::Off,
            lens: Lens::Back,
        }
    }
}

/// What a single press of the capture control did
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureAction {
    /// Photo mode: the finished photo
    Photo(CapturedMedia),
    /// Video mode, idle: a recording is now running
    RecordingStarted,
    /// Video mode, recording: a stop was requested (or was already in
    /// flight); the finished video arrives as a [`CaptureEvent::Captured`]
    StopRequested,
}

/// Events broadcast by the capture session
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A recording started
    RecordingStarted,
    /// A capture completed; carries the finished media record
    Captured(CapturedMedia),
    /// An operation failed; state is back to idle
    Error(String),
}
