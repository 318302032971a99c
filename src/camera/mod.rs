//! Capture device adapter layer
//!
//! Defines the seam between the capture session and whatever provides the
//! physical camera/microphone, plus a simulated device for tests and
//! development.

pub mod sim;
pub mod traits;

pub use sim::SimulatedCamera;
pub use traits::{
    CameraDevice, CameraError, CameraResult, Container, Flash, Lens, MediaFile, PermissionStatus,
    PhotoRequest, RecordingCompletion, RecordingHandle, RecordingRequest, VideoCodec,
};
