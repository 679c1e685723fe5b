//! Preview sessions.

use std::sync::Arc;

use crate::project::Project;
use crate::script::PipelineBuilder;

use super::source::{DecodedFrame, FrameSource, FrameSourceError};
use super::tracker::FrameRequestTracker;

/// Receives accepted results. Called on whatever thread the source uses.
pub type FrameSink = Arc<dyn Fn(Result<DecodedFrame, FrameSourceError>) + Send + Sync>;

/// A frame source plus the bookkeeping that keeps stale frames out of the
/// viewer.
pub struct PreviewSession<S: FrameSource> {
    source: Arc<S>,
    tracker: Arc<FrameRequestTracker>,
    sink: FrameSink,
}

impl<S: FrameSource> PreviewSession<S> {
    pub fn new(source: Arc<S>, sink: FrameSink) -> Self {
        Self {
            source,
            tracker: Arc::new(FrameRequestTracker::new()),
            sink,
        }
    }

    pub fn tracker(&self) -> &FrameRequestTracker {
        &self.tracker
    }

    /// Load the project's pipeline, dropping everything in flight.
    ///
    /// `preview` selects the variant that stops before decimation.
    pub fn load_project(
        &self,
        project: &Project,
        preview: bool,
        preview_freeze_frames: bool,
    ) -> Result<(), FrameSourceError> {
        let builder = PipelineBuilder::new(project);
        let builder = if preview {
            builder.preview(preview_freeze_frames)
        } else {
            builder
        };
        let description = builder
            .build()
            .map_err(|e| FrameSourceError::Evaluation(e.to_string()))?;
        self.tracker.begin_batch();
        self.source.set_pipeline(&description).inspect_err(|e| {
            tracing::error!("Failed to load pipeline: {}", e);
        })
    }

    /// Request a batch of frames. Results of earlier batches that arrive
    /// later are dropped.
    pub fn request_frames(&self, frames: &[usize]) {
        let generation = self.tracker.begin_batch();
        tracing::trace!("Requesting {} frames (generation {})", frames.len(), generation);
        for &frame in frames {
            let ticket = self.tracker.register(frame);
            let tracker = Arc::clone(&self.tracker);
            let sink = Arc::clone(&self.sink);
            self.source.request_frame(
                frame,
                Box::new(move |result| {
                    if tracker.accept(ticket) {
                        sink(result);
                    }
                }),
            );
        }
    }

    /// Drop everything in flight without requesting anything new.
    pub fn cancel_pending(&self) {
        self.tracker.begin_batch();
    }
}
