//! Media hand-off pipeline module

pub mod handoff;

pub use handoff::{HandoffError, HandoffPipeline, MediaPreview};
