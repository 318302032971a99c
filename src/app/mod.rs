//! Application facade
//!
//! Wires the capture session, hand-off pipeline, and feed store into the
//! operations the host's screens call: the camera screen's capture
//! controls and permission gate, the preview screen's post action, and the
//! feed screen's read and clear-all.

use crate::camera::{CameraDevice, Flash, Lens, PermissionStatus};
use crate::capture::{CaptureAction, CaptureEvent, CaptureMode, CaptureSession, CaptureSettings, RecordingState};
use crate::compress::{CompressionOptions, ProgressFn, VideoCompressor};
use crate::feed::{PostedEntry, StorageGateway};
use crate::media::CapturedMedia;
use crate::pipeline::{HandoffPipeline, MediaPreview};
use crate::utils::error::{AppError, AppResult};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// The camera/feed application core
pub struct CameraApp {
    device: Arc<dyn CameraDevice>,
    session: CaptureSession,
    pipeline: HandoffPipeline,
    permissions: RwLock<PermissionStatus>,
}

impl CameraApp {
    /// Assemble the app over a device and a storage gateway
    pub fn new(device: Arc<dyn CameraDevice>, gateway: Arc<dyn StorageGateway>) -> Self {
        let permissions = device.permissions();
        Self {
            session: CaptureSession::new(Arc::clone(&device)),
            pipeline: HandoffPipeline::new(gateway),
            permissions: RwLock::new(permissions),
            device,
        }
    }

    /// Compress video before posting (the default posting path for video)
    pub fn with_compressor(
        mut self,
        compressor: Arc<dyn VideoCompressor>,
        options: CompressionOptions,
    ) -> Self {
        self.pipeline = self.pipeline.with_compressor(compressor, options);
        self
    }

    // ---- camera screen -------------------------------------------------

    /// Prompt for any missing capture permissions
    pub async fn request_permissions(&self) -> AppResult<PermissionStatus> {
        let status = self.device.request_permissions().await.map_err(AppError::from)?;
        *self.permissions.write() = status;
        if !status.granted() {
            tracing::warn!(?status, "capture permissions missing");
        }
        Ok(status)
    }

    /// Last known permission state
    pub fn permissions(&self) -> PermissionStatus {
        *self.permissions.read()
    }

    /// The single capture control
    ///
    /// Inert until both camera and microphone permission are granted.
    pub async fn capture(&self) -> AppResult<CaptureAction> {
        if !self.permissions().granted() {
            return Err(AppError::PermissionDenied);
        }
        self.session.capture().await.map_err(AppError::from)
    }

    /// Select photo or video mode (ignored while recording)
    pub fn set_mode(&self, mode: CaptureMode) {
        self.session.set_mode(mode);
    }

    /// Flip the flash setting for subsequent photos
    pub fn toggle_flash(&self) {
        let flash = self.session.settings().flash.toggled();
        self.session.set_flash(flash);
    }

    /// Switch between the front and back lens
    pub fn flip_lens(&self) {
        let lens = self.session.settings().lens.flipped();
        self.session.set_lens(lens);
    }

    /// Explicitly set the flash
    pub fn set_flash(&self, flash: Flash) {
        self.session.set_flash(flash);
    }

    /// Explicitly select a lens
    pub fn set_lens(&self, lens: Lens) {
        self.session.set_lens(lens);
    }

    /// Current capture settings
    pub fn settings(&self) -> CaptureSettings {
        self.session.settings()
    }

    /// Current recording state
    pub fn recording_state(&self) -> RecordingState {
        self.session.state()
    }

    /// Subscribe to capture events (started, captured media, errors)
    pub fn events(&self) -> broadcast::Receiver<CaptureEvent> {
        self.session.subscribe()
    }

    // ---- preview screen ------------------------------------------------

    /// Hold captured media for the user's post-or-discard decision
    pub fn preview(&self, media: CapturedMedia) -> MediaPreview {
        self.pipeline.preview(media)
    }

    /// Post previewed media to the feed
    pub async fn post(&self, preview: MediaPreview) -> AppResult<PostedEntry> {
        self.pipeline
            .post(preview.into_media())
            .await
            .map_err(AppError::from)
    }

    /// Post previewed media, forwarding compression progress
    pub async fn post_with_progress(
        &self,
        preview: MediaPreview,
        on_progress: ProgressFn<'_>,
    ) -> AppResult<PostedEntry> {
        self.pipeline
            .post_with_progress(preview.into_media(), on_progress)
            .await
            .map_err(AppError::from)
    }

    // ---- feed screen ---------------------------------------------------

    /// Read the posted feed, newest first
    pub async fn feed(&self) -> AppResult<Vec<PostedEntry>> {
        self.pipeline
            .feed()
            .entries()
            .await
            .map_err(AppError::from)
    }

    /// Delete every posted entry
    pub async fn clear_feed(&self) -> AppResult<()> {
        self.pipeline.clear_all().await.map_err(AppError::from)
    }
}
