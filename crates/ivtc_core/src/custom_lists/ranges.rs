//! Ordered, non-overlapping frame ranges keyed by first frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProjectError, ProjectResult};
use crate::models::FrameRange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameRanges {
    ranges: BTreeMap<usize, FrameRange>,
}

impl FrameRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameRange> {
        self.ranges.values()
    }

    /// The range starting exactly at `first`.
    pub fn get(&self, first: usize) -> Option<&FrameRange> {
        self.ranges.get(&first)
    }

    /// The range covering `frame`.
    pub fn find(&self, frame: usize) -> Option<&FrameRange> {
        self.ranges
            .range(..=frame)
            .next_back()
            .map(|(_, range)| range)
            .filter(|range| range.contains(frame))
    }

    /// An existing range overlapping `range`, if any.
    pub fn overlapping(&self, range: &FrameRange) -> Option<&FrameRange> {
        // Stored ranges are disjoint, so the last one starting at or before
        // `range.last` also ends latest.
        self.ranges
            .range(..=range.last)
            .next_back()
            .map(|(_, existing)| existing)
            .filter(|existing| existing.last >= range.first)
    }

    /// Insert a range, failing if it overlaps one already present.
    pub fn insert(&mut self, range: FrameRange) -> ProjectResult<()> {
        if range.first > range.last {
            return Err(ProjectError::InvalidRange {
                first: range.first,
                last: range.last,
            });
        }
        if let Some(existing) = self.overlapping(&range) {
            return Err(ProjectError::OverlappingRange {
                first: range.first,
                last: range.last,
                existing_first: existing.first,
                existing_last: existing.last,
            });
        }
        self.ranges.insert(range.first, range);
        Ok(())
    }

    /// Remove the range starting at `first`.
    pub fn remove(&mut self, first: usize) -> ProjectResult<FrameRange> {
        self.ranges
            .remove(&first)
            .ok_or_else(|| ProjectError::not_found("Range starting at frame", first))
    }
}

impl Serialize for FrameRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ranges.values())
    }
}

impl<'de> Deserialize<'de> for FrameRanges {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<FrameRange>::deserialize(deserializer)?;
        let mut ranges = FrameRanges::new();
        for range in list {
            ranges.insert(range).map_err(serde::de::Error::custom)?;
        }
        Ok(ranges)
    }
}
