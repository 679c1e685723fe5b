//! Frame decisions and the numbering derived from them.
//!
//! - **decisions**: the per-frame match and decimation arrays
//! - **mapper**: source <-> output frame numbers, decimation ranges
//! - **rates**: frame-rate breakdown per decimation range

mod decisions;
mod mapper;
mod rates;

pub use decisions::FrameDecisionTable;
pub use mapper::{FrameNumberMapper, CYCLE};
pub use rates::{FrameRateBreakdown, FrameRateRange};
