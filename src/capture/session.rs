//! Capture session
//!
//! Orchestrates the single capture control: photo capture, recording
//! start/stop, the auto-stop timer, and completion hand-off. One session
//! owns one device and all of its recording state; nothing here is
//! process-global, so multiple camera screens in a host get independent
//! timers.

use super::state::{CaptureAction, CaptureEvent, CaptureMode, CaptureSettings, RecordingState};
use crate::camera::{CameraDevice, CameraError, Flash, Lens, PhotoRequest, RecordingHandle, RecordingRequest};
use crate::media::CapturedMedia;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// How long a recording may run before the session stops it on its own
pub const DEFAULT_AUTO_STOP: Duration = Duration::from_secs(10);

/// The photo/video capture state machine
///
/// Long-lived and reusable across captures. The capture control is not
/// re-entrant while a photo capture is outstanding; hosts should disable
/// the control until [`CaptureSession::capture`] resolves.
pub struct CaptureSession {
    shared: Arc<Shared>,
    settings: RwLock<CaptureSettings>,
    auto_stop_after: Duration,
}

struct Shared {
    device: Arc<dyn CameraDevice>,
    state: RwLock<RecordingState>,
    /// Auto-stop timer slot. Every path that can stop the recording must
    /// take the contents first; only the taker performs the stop, so a
    /// recording is stopped at most once.
    auto_stop: Mutex<Option<AbortHandle>>,
    event_tx: broadcast::Sender<CaptureEvent>,
}

impl CaptureSession {
    /// Create a session with the default 10 second auto-stop
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self::with_auto_stop(device, DEFAULT_AUTO_STOP)
    }

    /// Create a session with a custom auto-stop duration
    pub fn with_auto_stop(device: Arc<dyn CameraDevice>, auto_stop_after: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                device,
                state: RwLock::new(RecordingState::Idle),
                auto_stop: Mutex::new(None),
                event_tx,
            }),
            settings: RwLock::new(CaptureSettings::default()),
            auto_stop_after,
        }
    }

    /// Current recording state
    pub fn state(&self) -> RecordingState {
        *self.shared.state.read()
    }

    /// Whether a recording is in progress
    pub fn is_recording(&self) -> bool {
        self.state() == RecordingState::Recording
    }

    /// Current capture settings
    pub fn settings(&self) -> CaptureSettings {
        *self.settings.read()
    }

    /// Subscribe to capture events
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Select what the capture control does
    ///
    /// Ignored while a recording is in progress; the mode control only
    /// means something in idle.
    pub fn set_mode(&self, mode: CaptureMode) {
        if self.is_recording() {
            tracing::warn!(?mode, "ignoring mode change while recording");
            return;
        }
        self.settings.write().mode = mode;
    }

    /// Set the flash for subsequent photo captures
    pub fn set_flash(&self, flash: Flash) {
        self.settings.write().flash = flash;
    }

    /// Select which lens subsequent operations use
    pub fn set_lens(&self, lens: Lens) {
        self.settings.write().lens = lens;
    }

    /// The single capture control
    ///
    /// Photo mode: one photo per call. Video mode: starts a recording when
    /// idle, requests a stop when recording. Finished media is broadcast as
    /// [`CaptureEvent::Captured`]; photos are also returned directly.
    pub async fn capture(&self) -> Result<CaptureAction, CameraError> {
        let settings = self.settings();
        match settings.mode {
            CaptureMode::Photo => self.take_photo(settings).await,
            CaptureMode::Video => {
                if self.is_recording() {
                    self.stop_recording().await
                } else {
                    self.start_recording(settings).await
                }
            }
        }
    }

    async fn take_photo(&self, settings: CaptureSettings) -> Result<CaptureAction, CameraError> {
        let request = PhotoRequest {
            flash: settings.flash,
            lens: settings.lens,
        };
        match self.shared.device.take_photo(request).await {
            Ok(file) => {
                let media = CapturedMedia::photo(file.path.to_string_lossy());
                tracing::debug!(uri = %media.uri, "photo captured");
                self.shared.emit(CaptureEvent::Captured(media.clone()));
                Ok(CaptureAction::Photo(media))
            }
            Err(e) => {
                tracing::error!(error = %e, "photo capture failed");
                self.shared.emit(CaptureEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn start_recording(&self, settings: CaptureSettings) -> Result<CaptureAction, CameraError> {
        let recording_id = Uuid::new_v4();
        let request = RecordingRequest {
            lens: settings.lens,
            ..RecordingRequest::default()
        };
        let handle = match self.shared.device.start_recording(request).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(%recording_id, error = %e, "failed to start recording");
                self.shared.emit(CaptureEvent::Error(e.to_string()));
                return Err(e);
            }
        };

        *self.shared.state.write() = RecordingState::Recording;
        self.shared.emit(CaptureEvent::RecordingStarted);
        tracing::info!(%recording_id, "recording started");

        // Watcher: resolves exactly once when the adapter finishes or fails.
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.watch_recording(recording_id, handle).await;
        });

        // Auto-stop timer. Its abort handle goes into the slot; whoever
        // takes the handle out owns the stop call.
        let shared = Arc::clone(&self.shared);
        let after = self.auto_stop_after;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if shared.auto_stop.lock().take().is_none() {
                // A stop already happened or is in flight.
                return;
            }
            if *shared.state.read() != RecordingState::Recording {
                return;
            }
            tracing::info!(%recording_id, "auto-stop timer elapsed, stopping recording");
            if let Err(e) = shared.device.stop_recording().await {
                tracing::error!(%recording_id, error = %e, "auto-stop failed");
                shared.recording_failed(&e.to_string());
            }
        });
        *self.shared.auto_stop.lock() = Some(timer.abort_handle());

        Ok(CaptureAction::RecordingStarted)
    }

    async fn stop_recording(&self) -> Result<CaptureAction, CameraError> {
        let Some(timer) = self.shared.auto_stop.lock().take() else {
            // The timer (or an earlier press) already owns the stop.
            return Ok(CaptureAction::StopRequested);
        };
        timer.abort();
        tracing::info!("stopping recording");
        match self.shared.device.stop_recording().await {
            Ok(()) => Ok(CaptureAction::StopRequested),
            Err(e) => {
                tracing::error!(error = %e, "stop failed");
                self.shared.recording_failed(&e.to_string());
                Err(e)
            }
        }
    }
}

impl Shared {
    fn emit(&self, event: CaptureEvent) {
        let _ = self.event_tx.send(event);
    }

    async fn watch_recording(self: Arc<Self>, recording_id: Uuid, handle: RecordingHandle) {
        match handle.finished().await {
            Ok(file) => {
                self.clear_auto_stop();
                *self.state.write() = RecordingState::Idle;
                let media = CapturedMedia::video(file.path.to_string_lossy());
                tracing::info!(%recording_id, uri = %media.uri, "recording finished");
                self.emit(CaptureEvent::Captured(media));
            }
            Err(e) => {
                tracing::error!(%recording_id, error = %e, "recording failed");
                self.recording_failed(&e.to_string());
            }
        }
    }

    fn clear_auto_stop(&self) {
        if let Some(timer) = self.auto_stop.lock().take() {
            timer.abort();
        }
    }

    /// Common teardown: timer dead, state idle, error surfaced, no media.
    fn recording_failed(&self, message: &str) {
        self.clear_auto_stop();
        *self.state.write() = RecordingState::Idle;
        self.emit(CaptureEvent::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{
        CameraResult, MediaFile, PermissionStatus, RecordingCompletion,
    };
    use crate::media::MediaKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MockCamera {
        photos: AtomicUsize,
        starts: AtomicUsize,
        stops: AtomicUsize,
        fail_photo: AtomicBool,
        complete_on_stop: bool,
        completion: Mutex<Option<RecordingCompletion>>,
    }

    impl MockCamera {
        fn new(complete_on_stop: bool) -> Arc<Self> {
            Arc::new(Self {
                photos: AtomicUsize::new(0),
                starts: AtomicUsize::new(0),
                stops: AtomicUsize::new(0),
                fail_photo: AtomicBool::new(false),
                complete_on_stop,
                completion: Mutex::new(None),
            })
        }

        fn take_completion(&self) -> RecordingCompletion {
            self.completion.lock().take().expect("no active recording")
        }
    }

    #[async_trait]
    impl CameraDevice for MockCamera {
        async fn take_photo(&self, _request: PhotoRequest) -> CameraResult<MediaFile> {
            let n = self.photos.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_photo.load(Ordering::SeqCst) {
                return Err(CameraError::Capture("shutter jammed".into()));
            }
            Ok(MediaFile::new(format!("/media/photo-{n}.jpg")))
        }

        async fn start_recording(&self, _request: RecordingRequest) -> CameraResult<RecordingHandle> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            let (handle, completion) = RecordingHandle::channel();
            *self.completion.lock() = Some(completion);
            Ok(handle)
        }

        async fn stop_recording(&self) -> CameraResult<()> {
            let n = self.stops.fetch_add(1, Ordering::SeqCst) + 1;
            if self.complete_on_stop {
                self.take_completion()
                    .finish(MediaFile::new(format!("/media/clip-{n}.mp4")));
            }
            Ok(())
        }

        fn permissions(&self) -> PermissionStatus {
            PermissionStatus {
                camera: true,
                microphone: true,
            }
        }

        async fn request_permissions(&self) -> CameraResult<PermissionStatus> {
            Ok(self.permissions())
        }
    }

    async fn next_captured(events: &mut broadcast::Receiver<CaptureEvent>) -> CapturedMedia {
        loop {
            match events.recv().await.expect("event channel closed") {
                CaptureEvent::Captured(media) => return media,
                _ => continue,
            }
        }
    }

    async fn next_error(events: &mut broadcast::Receiver<CaptureEvent>) -> String {
        loop {
            match events.recv().await.expect("event channel closed") {
                CaptureEvent::Error(message) => return message,
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn test_photo_mode_one_call_per_action() {
        let device = MockCamera::new(true);
        let session = CaptureSession::new(device.clone());

        for _ in 0..3 {
            let action = session.capture().await.unwrap();
            assert!(matches!(action, CaptureAction::Photo(_)));
            assert_eq!(session.state(), RecordingState::Idle);
        }
        assert_eq!(device.photos.load(Ordering::SeqCst), 3);
        assert_eq!(device.starts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_photo_failure_stays_idle() {
        let device = MockCamera::new(true);
        device.fail_photo.store(true, Ordering::SeqCst);
        let session = CaptureSession::new(device.clone());
        let mut events = session.subscribe();

        assert!(session.capture().await.is_err());
        assert_eq!(session.state(), RecordingState::Idle);
        assert!(next_error(&mut events).await.contains("shutter jammed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_stop_cancels_auto_stop() {
        let device = MockCamera::new(true);
        let session = CaptureSession::new(device.clone());
        session.set_mode(CaptureMode::Video);
        let mut events = session.subscribe();

        assert_eq!(session.capture().await.unwrap(), CaptureAction::RecordingStarted);
        assert!(session.is_recording());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.capture().await.unwrap(), CaptureAction::StopRequested);

        let media = next_captured(&mut events).await;
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(session.state(), RecordingState::Idle);

        // The timer must never fire after the manual stop.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_stop_fires_after_timeout() {
        let device = MockCamera::new(true);
        let session = CaptureSession::new(device.clone());
        session.set_mode(CaptureMode::Video);
        let mut events = session.subscribe();

        session.capture().await.unwrap();
        assert!(session.is_recording());

        tokio::time::sleep(Duration::from_secs(11)).await;
        let media = next_captured(&mut events).await;
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);
        assert_eq!(session.state(), RecordingState::Idle);

        // And only once.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_press_while_stop_in_flight_is_a_no_op() {
        let device = MockCamera::new(false);
        let session = CaptureSession::new(device.clone());
        session.set_mode(CaptureMode::Video);
        let mut events = session.subscribe();

        session.capture().await.unwrap();
        assert_eq!(session.capture().await.unwrap(), CaptureAction::StopRequested);
        assert_eq!(session.capture().await.unwrap(), CaptureAction::StopRequested);
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);

        // Adapter completes later; the session lands in idle with the media.
        device
            .take_completion()
            .finish(MediaFile::new("/media/clip-late.mp4"));
        let media = next_captured(&mut events).await;
        assert_eq!(media.uri, "/media/clip-late.mp4");
        assert_eq!(session.state(), RecordingState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_adapter_error_mid_recording() {
        let device = MockCamera::new(false);
        let session = CaptureSession::new(device.clone());
        session.set_mode(CaptureMode::Video);
        let mut events = session.subscribe();

        session.capture().await.unwrap();
        device
            .take_completion()
            .fail(CameraError::Recording("disk full".into()));

        assert!(next_error(&mut events).await.contains("disk full"));
        assert_eq!(session.state(), RecordingState::Idle);

        // Timer was cleared with the failure; no late stop call.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(device.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_change_ignored_while_recording() {
        let device = MockCamera::new(true);
        let session = CaptureSession::new(device.clone());
        session.set_mode(CaptureMode::Video);

        session.capture().await.unwrap();
        session.set_mode(CaptureMode::Photo);
        assert_eq!(session.settings().mode, CaptureMode::Video);

        session.capture().await.unwrap();
        // Let the completion watcher bring the session back to idle.
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.set_mode(CaptureMode::Photo);
        assert_eq!(session.settings().mode, CaptureMode::Photo);
    }

    #[tokio::test]
    async fn test_flash_and_lens_apply_to_next_capture() {
        let device = MockCamera::new(true);
        let session = CaptureSession::new(device.clone());

        session.set_flash(Flash::On);
        session.set_lens(Lens::Front);
        assert_eq!(session.settings().flash, Flash::On);
        assert_eq!(session.settings().lens, Lens::Front);
    }
}
