//! Frames marked as combed.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use crate::error::{check_frame, ProjectResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombedFrameSet {
    frames: BTreeSet<usize>,
}

impl CombedFrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.iter().copied()
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.frames.contains(&frame)
    }

    /// Returns whether the frame was newly added.
    pub fn add(&mut self, frame: usize, frame_count: usize) -> ProjectResult<bool> {
        check_frame(frame, frame_count)?;
        Ok(self.frames.insert(frame))
    }

    /// Returns whether the frame was present.
    pub fn delete(&mut self, frame: usize) -> bool {
        self.frames.remove(&frame)
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.frames.is_empty();
        self.frames.clear();
        had_any
    }

    pub fn find_next(&self, frame: usize) -> Option<usize> {
        self.frames.range((Excluded(frame), Unbounded)).next().copied()
    }

    pub fn find_previous(&self, frame: usize) -> Option<usize> {
        self.frames.range(..frame).next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_delete_navigate() {
        let mut set = CombedFrameSet::new();
        assert!(set.add(3, 10).unwrap());
        assert!(!set.add(3, 10).unwrap());
        assert!(set.add(7, 10).unwrap());
        assert!(set.add(10, 10).is_err());

        assert_eq!(set.find_next(3), Some(7));
        assert_eq!(set.find_previous(7), Some(3));
        assert_eq!(set.find_previous(3), None);

        assert!(set.delete(3));
        assert!(!set.delete(3));
        assert!(set.clear());
        assert!(!set.clear());
    }
}
