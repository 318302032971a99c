//! Capture session module
//!
//! The photo/video state machine behind the single capture control:
//! - `state`: recording state, capture mode, settings, events
//! - `session`: the `CaptureSession` owning the machine and its timer

pub mod session;
pub mod state;

pub use session::{CaptureSession, DEFAULT_AUTO_STOP};
pub use state::{CaptureAction, CaptureEvent, CaptureMode, CaptureSettings, RecordingState};
