//! Error types and handling
//!
//! Application-wide error taxonomy. Every failure is handled at the
//! operation boundary: logged, surfaced to the caller, never allowed to
//! leave the session stuck mid-recording. Nothing is retried
//! automatically; each failure waits for a new user action.

use crate::camera::CameraError;
use crate::compress::CompressionError;
use crate::feed::StorageError;
use crate::pipeline::HandoffError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Camera or microphone permission is missing; capture controls stay
    /// inert until granted
    #[error("camera or microphone permission not granted")]
    PermissionDenied,

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("recording failed: {0}")]
    RecordingFailed(String),

    #[error("compression failed: {0}")]
    CompressionFailed(#[from] CompressionError),

    #[error("storage failed: {0}")]
    StorageFailed(#[from] StorageError),
}

impl From<CameraError> for AppError {
    fn from(error: CameraError) -> Self {
        match error {
            CameraError::PermissionDenied => AppError::PermissionDenied,
            CameraError::Capture(m) => AppError::CaptureFailed(m),
            CameraError::Recording(m) => AppError::RecordingFailed(m),
            busy @ CameraError::AlreadyRecording => AppError::CaptureFailed(busy.to_string()),
            other => AppError::RecordingFailed(other.to_string()),
        }
    }
}

impl From<HandoffError> for AppError {
    fn from(error: HandoffError) -> Self {
        match error {
            HandoffError::Compression(e) => AppError::CompressionFailed(e),
            HandoffError::Storage(e) => AppError::StorageFailed(e),
        }
    }
}

/// User-facing notice for host UIs
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorNotice {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::PermissionDenied => "PERMISSION_DENIED",
            AppError::CaptureFailed(_) => "CAPTURE_FAILED",
            AppError::RecordingFailed(_) => "RECORDING_FAILED",
            AppError::CompressionFailed(_) => "COMPRESSION_FAILED",
            AppError::StorageFailed(_) => "STORAGE_FAILED",
        };

        ErrorNotice {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
