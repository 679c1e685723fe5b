//! Per-frame metrics supplied by the frame-source engine.
//!
//! Nothing here is computed by the engine itself. The metrics are inputs
//! for pattern guessing and for the frame searches used while reviewing:
//! - **mics**: combing per match (`p`, `c`, `n`, `b`, `u`)
//! - **mmetrics / vmetrics**: DMetrics per match (`p`, `c`, `n`)
//! - **decimate metrics**: difference to the previous frame
//! - **original matches**: what the field matcher decided
//! - **interlaced fades**: frames whose fields differ in brightness

mod frame_metrics;
mod search;

pub use frame_metrics::FrameMetrics;
pub use search::{c_match_sequences, group_fades};
