//! Frame-rate breakdown derived from decimation.

use serde::{Deserialize, Serialize};

use crate::models::FrameRate;

/// A run of source frames playing at one output rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRateRange {
    pub first: usize,
    pub last: usize,
    /// Frames dropped per 5-frame cycle.
    pub dropped: usize,
    pub rate: FrameRate,
}

impl FrameRateRange {
    pub fn new(first: usize, last: usize, dropped: usize) -> Self {
        Self {
            first,
            last,
            dropped,
            rate: FrameRate::for_dropped(dropped),
        }
    }
}

/// Per-range frame rates plus source-frame totals per drop count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRateBreakdown {
    ranges: Vec<FrameRateRange>,
    /// Index is the drop count (0..=5).
    totals: [usize; 6],
}

impl FrameRateBreakdown {
    pub(crate) fn push(&mut self, range: FrameRateRange) {
        self.totals[range.dropped.min(5)] += range.last - range.first + 1;
        self.ranges.push(range);
    }

    pub fn ranges(&self) -> &[FrameRateRange] {
        &self.ranges
    }

    /// Source frames living in cycles with `dropped` frames removed.
    pub fn frames_with_dropped(&self, dropped: usize) -> usize {
        self.totals.get(dropped).copied().unwrap_or(0)
    }

    /// Ranges whose drop count is among `shown`, as a frame-rate viewer
    /// filtered by checkboxes would list them.
    pub fn filtered(&self, shown: &[usize]) -> Vec<FrameRateRange> {
        self.ranges
            .iter()
            .filter(|r| shown.contains(&r.dropped))
            .copied()
            .collect()
    }
}
