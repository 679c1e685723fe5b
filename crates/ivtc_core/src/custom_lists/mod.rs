//! Custom lists: named, positioned sets of frame ranges that inject a preset
//! into the generated pipeline.
//!
//! - **ranges**: an ordered set of non-overlapping ranges
//! - **collection**: the ordered lists themselves

mod collection;
mod ranges;

pub use collection::{CustomList, CustomListCollection};
pub use ranges::FrameRanges;
