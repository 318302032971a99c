//! Snapfeed - capture a moment, post it to your local feed.
//!
//! This crate is the backend core of a small camera/feed application:
//! capture a photo or short video through a pluggable device adapter,
//! preview it, optionally compress video, post it to an on-device feed,
//! and read the feed back. There is no server; posting persists an entry
//! in local key-value storage and media is referenced by local paths.
//!
//! # Architecture
//!
//! - [`camera`] - the device adapter seam (plus a simulated device)
//! - [`capture`] - the photo/video capture session state machine
//! - [`compress`] - off-thread video compression via ffmpeg
//! - [`feed`] - posted entries, the storage gateway, the feed store
//! - [`pipeline`] - preview → compress → persist hand-off
//! - [`app`] - the facade host applications drive their screens with
//!
//! # Example
//!
//! ```ignore
//! use snapfeed::{CameraApp, CaptureAction};
//! use snapfeed::camera::SimulatedCamera;
//! use snapfeed::feed::FileStorage;
//! use std::sync::Arc;
//!
//! let app = CameraApp::new(
//!     Arc::new(SimulatedCamera::new()?),
//!     Arc::new(FileStorage::new("/tmp/snapfeed")),
//! );
//! app.request_permissions().await?;
//! if let CaptureAction::Photo(photo) = app.capture().await? {
//!     app.post(app.preview(photo)).await?;
//! }
//! ```

pub mod app;
pub mod camera;
pub mod capture;
pub mod compress;
pub mod feed;
pub mod media;
pub mod pipeline;
pub mod utils;

pub use app::CameraApp;
pub use capture::{CaptureAction, CaptureEvent, CaptureMode, CaptureSession, RecordingState};
pub use media::{CapturedMedia, MediaKind};
pub use utils::error::{AppError, AppResult, ErrorNotice};
pub use utils::logging::init_tracing;
