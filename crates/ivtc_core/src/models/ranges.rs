//! Inclusive frame ranges.

use serde::{Deserialize, Serialize};

/// An inclusive range of source frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameRange {
    pub first: usize,
    pub last: usize,
}

impl FrameRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// A range covering a single frame.
    pub fn single(frame: usize) -> Self {
        Self {
            first: frame,
            last: frame,
        }
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, frame: usize) -> bool {
        frame >= self.first && frame <= self.last
    }

    pub fn overlaps(&self, other: &FrameRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &FrameRange) -> FrameRange {
        FrameRange {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.first, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_inclusive() {
        let a = FrameRange::new(10, 20);
        assert!(a.overlaps(&FrameRange::new(20, 25)));
        assert!(a.overlaps(&FrameRange::new(0, 10)));
        assert!(a.overlaps(&FrameRange::new(12, 13)));
        assert!(!a.overlaps(&FrameRange::new(21, 30)));
        assert!(!a.overlaps(&FrameRange::new(0, 9)));
    }

    #[test]
    fn len_and_union() {
        assert_eq!(FrameRange::single(4).len(), 1);
        assert_eq!(
            FrameRange::new(3, 5).union(&FrameRange::new(8, 9)),
            FrameRange::new(3, 9)
        );
    }
}
