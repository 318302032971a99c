//! Capture device trait definitions
//!
//! Platform-agnostic seam for the physical camera/microphone. Host
//! applications plug their device layer in behind [`CameraDevice`];
//! [`crate::camera::sim::SimulatedCamera`] is provided for tests and
//! development.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors reported by a capture device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera or microphone permission denied")]
    PermissionDenied,

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("recording failed: {0}")]
    Recording(String),

    #[error("no recording in progress")]
    NotRecording,

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("device disconnected before completing")]
    Disconnected,
}

/// Result type alias for device operations
pub type CameraResult<T> = Result<T, CameraError>;

/// Flash setting applied to subsequent photo captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flash {
    On,
    Off,
}

impl Flash {
    /// The opposite setting, for a toggle control
    pub fn toggled(self) -> Self {
        match self {
            Flash::On => Flash::Off,
            Flash::Off => Flash::On,
        }
    }
}

/// Which physical lens faces the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lens {
    Front,
    Back,
}

impl Lens {
    /// The opposite lens, for a camera-flip control
    pub fn flipped(self) -> Self {
        match self {
            Lens::Front => Lens::Back,
            Lens::Back => Lens::Front,
        }
    }
}

/// Container format for recorded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Mp4,
}

impl Container {
    /// File extension for this container
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
        }
    }
}

/// Video codec requested for recordings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
}

impl VideoCodec {
    /// Codec name as the device layer expects it
    pub fn name(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
        }
    }
}

/// Permission state of the capture hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStatus {
    pub camera: bool,
    pub microphone: bool,
}

impl PermissionStatus {
    /// Whether everything capture needs has been granted
    pub fn granted(&self) -> bool {
        self.camera && self.microphone
    }
}

/// A media file produced by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Local filesystem path of the finished file
    pub path: PathBuf,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parameters for a single photo capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRequest {
    pub flash: Flash,
    pub lens: Lens,
}

/// Parameters for starting a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingRequest {
    pub container: Container,
    pub codec: VideoCodec,
    pub lens: Lens,
}

impl Default for RecordingRequest {
    fn default() -> Self {
        Self {
            container: Container::Mp4,
            codec: VideoCodec::H264,
            lens: Lens::Back,
        }
    }
}

/// Completion side of an in-flight recording, held by the device adapter
///
/// Consuming it is the only way to resolve the paired [`RecordingHandle`],
/// so an adapter cannot report completion twice.
pub struct RecordingCompletion {
    tx: oneshot::Sender<CameraResult<MediaFile>>,
}

impl RecordingCompletion {
    /// Resolve the recording with its finished file
    pub fn finish(self, video: MediaFile) {
        let _ = self.tx.send(Ok(video));
    }

    /// Resolve the recording with the error that ended it
    pub fn fail(self, error: CameraError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Caller side of an in-flight recording
///
/// Resolves exactly once per `start_recording` call: either the finished
/// video or the error that ended the recording. A dropped adapter resolves
/// as [`CameraError::Disconnected`].
pub struct RecordingHandle {
    rx: oneshot::Receiver<CameraResult<MediaFile>>,
}

impl RecordingHandle {
    /// Create a connected handle/completion pair
    pub fn channel() -> (Self, RecordingCompletion) {
        let (tx, rx) = oneshot::channel();
        (Self { rx }, RecordingCompletion { tx })
    }

    /// Wait for the recording to finish or fail
    pub async fn finished(self) -> CameraResult<MediaFile> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(CameraError::Disconnected),
        }
    }
}

/// Device adapter for the physical camera/microphone
///
/// Contract: the handle returned by `start_recording` resolves exactly
/// once, and `stop_recording` is only valid while a recording is active.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Capture a single photo and return its finished file
    async fn take_photo(&self, request: PhotoRequest) -> CameraResult<MediaFile>;

    /// Begin recording; completion is observed through the returned handle
    async fn start_recording(&self, request: RecordingRequest) -> CameraResult<RecordingHandle>;

    /// Ask the device to finalize the active recording
    ///
    /// The finished file arrives through the handle from `start_recording`,
    /// not from this call.
    async fn stop_recording(&self) -> CameraResult<()>;

    /// Current permission state, without prompting
    fn permissions(&self) -> PermissionStatus;

    /// Prompt for any missing permissions and report the resulting state
    async fn request_permissions(&self) -> CameraResult<PermissionStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_resolves_once_with_file() {
        let (handle, completion) = RecordingHandle::channel();
        completion.finish(MediaFile::new("/tmp/clip.mp4"));
        let file = handle.finished().await.unwrap();
        assert_eq!(file.path, PathBuf::from("/tmp/clip.mp4"));
    }

    #[tokio::test]
    async fn test_dropped_completion_reads_as_disconnected() {
        let (handle, completion) = RecordingHandle::channel();
        drop(completion);
        assert_eq!(handle.finished().await, Err(CameraError::Disconnected));
    }
}
