//! Simulated capture device
//!
//! A software stand-in for real camera hardware, used by tests and by
//! host applications during development. Captures are fabricated as small
//! placeholder files in a private temp directory; the recording contract
//! (exactly-once handle resolution, stop only while active) matches what a
//! real adapter must provide.

use super::traits::{
    CameraDevice, CameraError, CameraResult, MediaFile, PermissionStatus, PhotoRequest,
    RecordingCompletion, RecordingHandle, RecordingRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct ActiveRecording {
    completion: RecordingCompletion,
    path: PathBuf,
}

struct SimInner {
    active: Option<ActiveRecording>,
    shots: u32,
}

/// In-memory camera for tests and development hosts
pub struct SimulatedCamera {
    dir: TempDir,
    permissions: PermissionStatus,
    inner: Mutex<SimInner>,
}

impl SimulatedCamera {
    /// A camera with all permissions granted
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            permissions: PermissionStatus {
                camera: true,
                microphone: true,
            },
            inner: Mutex::new(SimInner {
                active: None,
                shots: 0,
            }),
        })
    }

    /// A camera whose permission prompts were declined
    pub fn denied() -> std::io::Result<Self> {
        let mut camera = Self::new()?;
        camera.permissions = PermissionStatus {
            camera: false,
            microphone: false,
        };
        Ok(camera)
    }

    fn next_path(&self, prefix: &str, extension: &str) -> PathBuf {
        let mut inner = self.inner.lock();
        inner.shots += 1;
        self.dir
            .path()
            .join(format!("{}-{}.{}", prefix, inner.shots, extension))
    }
}

#[async_trait]
impl CameraDevice for SimulatedCamera {
    async fn take_photo(&self, request: PhotoRequest) -> CameraResult<MediaFile> {
        if !self.permissions.granted() {
            return Err(CameraError::PermissionDenied);
        }
        let path = self.next_path("photo", "jpg");
        fs::write(&path, format!("photo flash={:?} lens={:?}", request.flash, request.lens))
            .map_err(|e| CameraError::Capture(e.to_string()))?;
        Ok(MediaFile::new(path))
    }

    async fn start_recording(&self, request: RecordingRequest) -> CameraResult<RecordingHandle> {
        if !self.permissions.granted() {
            return Err(CameraError::PermissionDenied);
        }
        let mut inner = self.inner.lock();
        if inner.active.is_some() {
            return Err(CameraError::AlreadyRecording);
        }
        inner.shots += 1;
        let path = self
            .dir
            .path()
            .join(format!("clip-{}.{}", inner.shots, request.container.extension()));
        let (handle, completion) = RecordingHandle::channel();
        inner.active = Some(ActiveRecording { completion, path });
        Ok(handle)
    }

    async fn stop_recording(&self) -> CameraResult<()> {
        let Some(active) = self.inner.lock().active.take() else {
            return Err(CameraError::NotRecording);
        };
        match fs::write(&active.path, b"simulated footage") {
            Ok(()) => active.completion.finish(MediaFile::new(active.path)),
            Err(e) => active.completion.fail(CameraError::Recording(e.to_string())),
        }
        Ok(())
    }

    fn permissions(&self) -> PermissionStatus {
        self.permissions
    }

    async fn request_permissions(&self) -> CameraResult<PermissionStatus> {
        // The simulated prompt answers however the camera was constructed.
        Ok(self.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::traits::{Flash, Lens};

    #[tokio::test]
    async fn test_photo_lands_on_disk() {
        let camera = SimulatedCamera::new().unwrap();
        let file = camera
            .take_photo(PhotoRequest {
                flash: Flash::Off,
                lens: Lens::Back,
            })
            .await
            .unwrap();
        assert!(file.path.exists());
    }

    #[tokio::test]
    async fn test_record_stop_resolves_handle() {
        let camera = SimulatedCamera::new().unwrap();
        let handle = camera
            .start_recording(RecordingRequest::default())
            .await
            .unwrap();
        camera.stop_recording().await.unwrap();
        let file = handle.finished().await.unwrap();
        assert!(file.path.exists());
        assert_eq!(file.path.extension().unwrap(), "mp4");
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let camera = SimulatedCamera::new().unwrap();
        let _handle = camera
            .start_recording(RecordingRequest::default())
            .await
            .unwrap();
        assert_eq!(
            camera
                .start_recording(RecordingRequest::default())
                .await
                .err(),
            Some(CameraError::AlreadyRecording)
        );
    }

    #[tokio::test]
    async fn test_stop_without_recording_rejected() {
        let camera = SimulatedCamera::new().unwrap();
        assert_eq!(camera.stop_recording().await, Err(CameraError::NotRecording));
    }
}
