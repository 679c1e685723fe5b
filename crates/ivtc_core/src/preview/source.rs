//! The frame-source engine seam.

use thiserror::Error;

use crate::script::PipelineDescription;

/// Errors reported by a frame source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameSourceError {
    /// The engine itself could not start. Nothing else will work.
    #[error("Frame source failed to initialise: {0}")]
    InitFailed(String),

    /// The engine rejected a pipeline description.
    #[error("Pipeline evaluation failed: {0}")]
    Evaluation(String),

    /// A single frame could not be produced.
    #[error("Failed to get frame {frame}: {message}")]
    FrameFailed { frame: usize, message: String },
}

impl FrameSourceError {
    /// Whether the error leaves the engine unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FrameSourceError::InitFailed(_))
    }
}

/// A decoded frame in packed RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub frame: usize,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Completion callback for one frame request. May run on any thread.
pub type FrameCallback = Box<dyn FnOnce(Result<DecodedFrame, FrameSourceError>) + Send + 'static>;

/// An engine that evaluates pipeline descriptions and decodes frames.
pub trait FrameSource: Send + Sync {
    /// Replace the pipeline used by subsequent requests.
    fn set_pipeline(&self, description: &PipelineDescription) -> Result<(), FrameSourceError>;

    /// Ask for a frame of the current pipeline. `callback` runs exactly once.
    fn request_frame(&self, frame: usize, callback: FrameCallback);
}
