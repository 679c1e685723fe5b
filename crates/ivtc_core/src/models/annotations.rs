//! Annotation records attached to frames.

use serde::{Deserialize, Serialize};

use super::enums::{FieldKind, GuessFailureReason, Match};

/// Replace every frame of `[first, last]` with `replacement` in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeFrame {
    pub first: usize,
    pub last: usize,
    pub replacement: usize,
}

/// A user bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub frame: usize,
    pub description: String,
}

/// A field left without a partner in the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanField {
    pub frame: usize,
    /// The frame's match when the orphan was derived.
    #[serde(rename = "match")]
    pub match_: Match,
    /// The frame's own field left unpaired.
    pub field: FieldKind,
    /// Whether the frame itself is decimated.
    pub decimated: bool,
}

/// A section for which pattern guessing produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessFailure {
    pub section_start: usize,
    pub reason: GuessFailureReason,
}

/// A frame flagged by the frame-source engine as part of an interlaced fade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterlacedFade {
    pub frame: usize,
    pub field_difference: f64,
}

/// A run of consecutive 5-frame cycles sharing the same drop count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimationRange {
    /// First source frame of the run (always a cycle boundary).
    pub start: usize,
    pub dropped: usize,
}

/// A run of consecutive cycles sharing the same dropped offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimationPatternRange {
    pub start: usize,
    /// Dropped offsets within each cycle, ascending.
    pub dropped_offsets: Vec<u8>,
}
