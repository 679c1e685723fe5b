//! Freeze frames keyed by first frame.

use std::collections::BTreeMap;

use crate::error::{check_frame, check_range, ProjectError, ProjectResult};
use crate::models::{FrameRange, FreezeFrame};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeFrameSet {
    frames: BTreeMap<usize, FreezeFrame>,
}

impl FreezeFrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreezeFrame> {
        self.frames.values()
    }

    /// Add a freeze frame. Its range must not overlap another one.
    pub fn add(&mut self, freeze: FreezeFrame, frame_count: usize) -> ProjectResult<()> {
        check_range(freeze.first, freeze.last, frame_count)?;
        check_frame(freeze.replacement, frame_count)?;

        let range = FrameRange::new(freeze.first, freeze.last);
        if let Some(existing) = self
            .frames
            .range(..=freeze.last)
            .next_back()
            .map(|(_, existing)| existing)
            .filter(|existing| existing.last >= freeze.first)
        {
            return Err(ProjectError::OverlappingRange {
                first: range.first,
                last: range.last,
                existing_first: existing.first,
                existing_last: existing.last,
            });
        }

        self.frames.insert(freeze.first, freeze);
        tracing::debug!(
            "Added freeze frame {} -> {}",
            range,
            freeze.replacement
        );
        Ok(())
    }

    /// Delete the freeze frame starting at `first`.
    pub fn delete(&mut self, first: usize) -> ProjectResult<FreezeFrame> {
        self.frames
            .remove(&first)
            .ok_or_else(|| ProjectError::not_found("Freeze frame starting at frame", first))
    }

    /// The freeze frame covering `frame`.
    pub fn find(&self, frame: usize) -> Option<&FreezeFrame> {
        self.frames
            .range(..=frame)
            .next_back()
            .map(|(_, freeze)| freeze)
            .filter(|freeze| freeze.last >= frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freeze(first: usize, last: usize, replacement: usize) -> FreezeFrame {
        FreezeFrame {
            first,
            last,
            replacement,
        }
    }

    #[test]
    fn add_validates_and_rejects_overlap() {
        let mut set = FreezeFrameSet::new();
        set.add(freeze(10, 20, 9), 100).unwrap();

        assert!(matches!(
            set.add(freeze(20, 25, 26), 100),
            Err(ProjectError::OverlappingRange { .. })
        ));
        assert!(matches!(
            set.add(freeze(30, 25, 26), 100),
            Err(ProjectError::InvalidRange { .. })
        ));
        assert!(matches!(
            set.add(freeze(30, 35, 100), 100),
            Err(ProjectError::OutOfRange { .. })
        ));
        set.add(freeze(21, 25, 26), 100).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn find_and_delete() {
        let mut set = FreezeFrameSet::new();
        set.add(freeze(10, 20, 9), 100).unwrap();
        assert_eq!(set.find(15).map(|f| f.replacement), Some(9));
        assert!(set.find(21).is_none());
        assert!(set.delete(11).is_err());
        set.delete(10).unwrap();
        assert!(set.is_empty());
    }
}
