//! Asynchronous frame requests to the external frame-source engine.
//!
//! - **source**: the `FrameSource` trait the engine implements
//! - **tracker**: generation counting that drops stale results
//! - **session**: ties a source, a tracker and a frame sink together

mod session;
mod source;
mod tracker;

pub use session::{FrameSink, PreviewSession};
pub use source::{DecodedFrame, FrameCallback, FrameSource, FrameSourceError};
pub use tracker::{FrameRequestTracker, RequestTicket};
