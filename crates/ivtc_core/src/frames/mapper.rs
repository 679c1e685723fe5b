//! Source <-> output frame number mapping.
//!
//! The output numbering is what remains after decimation. Source frame `y`
//! lands on output frame `y - (decimated frames in [0, y))`; a decimated
//! frame therefore shares its output number with the next kept frame, and
//! only kept frames map back.
//!
//! Everything is computed once from the decimation flags in a single pass
//! and is exact: timecodes are generated from this mapping.

use crate::error::{check_frame, ProjectError, ProjectResult};
use crate::models::{DecimationPatternRange, DecimationRange, FrameRange};

use super::rates::{FrameRateBreakdown, FrameRateRange};

/// Frames per telecine cycle.
pub const CYCLE: usize = 5;

/// Immutable mapping built from a set of decimation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNumberMapper {
    /// `decimated_before[i]` = decimated frames in `[0, i)`; one extra entry.
    decimated_before: Vec<usize>,
    /// Source frame of each output frame.
    kept: Vec<usize>,
    /// Bitmask of dropped offsets per cycle.
    cycle_masks: Vec<u8>,
}

impl FrameNumberMapper {
    /// Build the mapping in O(n).
    pub fn build(decimated: &[bool]) -> Self {
        let frame_count = decimated.len();
        let mut decimated_before = Vec::with_capacity(frame_count + 1);
        let mut kept = Vec::with_capacity(frame_count);
        let mut cycle_masks = vec![0u8; frame_count.div_ceil(CYCLE)];

        let mut dropped = 0;
        for (frame, &is_dropped) in decimated.iter().enumerate() {
            decimated_before.push(dropped);
            if is_dropped {
                dropped += 1;
                cycle_masks[frame / CYCLE] |= 1 << (frame % CYCLE);
            } else {
                kept.push(frame);
            }
        }
        decimated_before.push(dropped);

        tracing::trace!(
            "Built frame number mapper: {} source frames, {} output frames",
            frame_count,
            kept.len()
        );

        Self {
            decimated_before,
            kept,
            cycle_masks,
        }
    }

    pub fn source_frame_count(&self) -> usize {
        self.decimated_before.len() - 1
    }

    pub fn output_frame_count(&self) -> usize {
        self.kept.len()
    }

    /// Output number of a source frame.
    ///
    /// Defined for every source frame; a decimated frame maps to the output
    /// number of the next kept frame.
    pub fn to_output(&self, source: usize) -> ProjectResult<usize> {
        check_frame(source, self.source_frame_count())?;
        Ok(source - self.decimated_before[source])
    }

    /// Output number of a kept source frame.
    ///
    /// Fails with `NotRepresented` for decimated frames.
    pub fn output_position(&self, source: usize) -> ProjectResult<usize> {
        let output = self.to_output(source)?;
        if self.kept.get(output) != Some(&source) {
            return Err(ProjectError::NotRepresented { frame: source });
        }
        Ok(output)
    }

    /// Source frame shown at an output frame number.
    pub fn to_source(&self, output: usize) -> ProjectResult<usize> {
        self.kept
            .get(output)
            .copied()
            .ok_or_else(|| ProjectError::out_of_range("Output frame", output, self.kept.len()))
    }

    /// Number of kept frames in `[first, last]`.
    pub fn kept_in(&self, range: FrameRange) -> usize {
        let end = (range.last + 1).min(self.source_frame_count());
        if range.first >= end {
            return 0;
        }
        (end - range.first) - (self.decimated_before[end] - self.decimated_before[range.first])
    }

    /// Number of frames dropped from the cycle with this index.
    pub fn cycle_drop_count(&self, cycle: usize) -> usize {
        self.cycle_masks
            .get(cycle)
            .map(|mask| mask.count_ones() as usize)
            .unwrap_or(0)
    }

    /// Runs of consecutive cycles with the same number of dropped frames.
    pub fn decimation_ranges(&self) -> Vec<DecimationRange> {
        let mut ranges: Vec<DecimationRange> = Vec::new();
        for (cycle, mask) in self.cycle_masks.iter().enumerate() {
            let dropped = mask.count_ones() as usize;
            match ranges.last() {
                Some(last) if last.dropped == dropped => {}
                _ => ranges.push(DecimationRange {
                    start: cycle * CYCLE,
                    dropped,
                }),
            }
        }
        ranges
    }

    /// Runs of consecutive cycles with identical dropped offsets.
    pub fn decimation_pattern_ranges(&self) -> Vec<DecimationPatternRange> {
        let mut ranges: Vec<DecimationPatternRange> = Vec::new();
        let mut last_mask = None;
        for (cycle, &mask) in self.cycle_masks.iter().enumerate() {
            if last_mask == Some(mask) {
                continue;
            }
            last_mask = Some(mask);
            ranges.push(DecimationPatternRange {
                start: cycle * CYCLE,
                dropped_offsets: (0..CYCLE as u8).filter(|o| mask & (1 << o) != 0).collect(),
            });
        }
        ranges
    }

    /// Frame-rate breakdown derived from the decimation ranges.
    pub fn frame_rates(&self) -> FrameRateBreakdown {
        let frame_count = self.source_frame_count();
        let ranges = self.decimation_ranges();
        let mut breakdown = FrameRateBreakdown::default();

        for (i, range) in ranges.iter().enumerate() {
            let last = ranges
                .get(i + 1)
                .map(|next| next.start - 1)
                .unwrap_or(frame_count - 1);
            breakdown.push(FrameRateRange::new(range.start, last, range.dropped));
        }

        breakdown
    }
}
