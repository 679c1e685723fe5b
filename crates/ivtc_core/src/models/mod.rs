//! Data models for IVTC Workbench.
//!
//! This module contains the plain value types shared by every component:
//! - Enums for matches, fields, pipeline positions and guessing policies
//! - Frame ranges and annotation records
//! - Output settings and source metadata
//! - Identifier rules for user-chosen names

mod annotations;
mod enums;
mod names;
mod output;
mod ranges;
mod source;

// Re-export all public types
pub use annotations::{
    Bookmark, DecimationPatternRange, DecimationRange, FreezeFrame, GuessFailure,
    InterlacedFade, OrphanField,
};
pub use enums::{
    parse_decimation_pattern, parse_match_pattern, DecimationFunction, DropDuplicate, FieldKind,
    GuessFailureReason, GuessMethod, Match, PatternFamily, PositionInFilterChain, UseThirdNMatch,
};
pub use names::validate_identifier;
pub use output::{Crop, Depth, OutputSettings, Resize};
pub use ranges::FrameRange;
pub use source::{FrameRate, SourceInfo};
