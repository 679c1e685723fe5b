//! Per-frame match and decimation decisions.

use crate::error::{check_frame, check_range, ProjectResult};
use crate::models::Match;

/// The authoritative per-frame arrays: one match and one drop flag per
/// source frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDecisionTable {
    matches: Vec<Match>,
    decimated: Vec<bool>,
}

impl FrameDecisionTable {
    /// All frames `c`, nothing decimated.
    pub fn new(frame_count: usize) -> Self {
        Self {
            matches: vec![Match::C; frame_count],
            decimated: vec![false; frame_count],
        }
    }

    /// Build from a match array and the list of decimated frames.
    pub fn from_parts(
        matches: Vec<Match>,
        decimated_frames: impl IntoIterator<Item = usize>,
    ) -> ProjectResult<Self> {
        let frame_count = matches.len();
        let mut decimated = vec![false; frame_count];
        for frame in decimated_frames {
            check_frame(frame, frame_count)?;
            decimated[frame] = true;
        }
        Ok(Self { matches, decimated })
    }

    pub fn frame_count(&self) -> usize {
        self.matches.len()
    }

    pub fn get_match(&self, frame: usize) -> ProjectResult<Match> {
        check_frame(frame, self.frame_count())?;
        Ok(self.matches[frame])
    }

    /// Set a frame's match. Returns whether anything changed.
    pub fn set_match(&mut self, frame: usize, value: Match) -> ProjectResult<bool> {
        check_frame(frame, self.frame_count())?;
        let changed = self.matches[frame] != value;
        self.matches[frame] = value;
        Ok(changed)
    }

    /// Advance a frame's match through `c -> b -> n -> c`.
    ///
    /// Frames matched `p` or `u` are left alone and report no change.
    pub fn cycle_match(&mut self, frame: usize) -> ProjectResult<bool> {
        let current = self.get_match(frame)?;
        self.set_match(frame, current.cycled())
    }

    pub fn is_decimated(&self, frame: usize) -> ProjectResult<bool> {
        check_frame(frame, self.frame_count())?;
        Ok(self.decimated[frame])
    }

    /// Set a frame's drop flag. Returns whether anything changed.
    pub fn set_decimated(&mut self, frame: usize, value: bool) -> ProjectResult<bool> {
        check_frame(frame, self.frame_count())?;
        let changed = self.decimated[frame] != value;
        self.decimated[frame] = value;
        Ok(changed)
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn decimation_flags(&self) -> &[bool] {
        &self.decimated
    }

    /// Decimated frames in ascending order.
    pub fn decimated_frames(&self) -> Vec<usize> {
        self.decimated
            .iter()
            .enumerate()
            .filter_map(|(frame, &dropped)| dropped.then_some(frame))
            .collect()
    }

    pub fn decimated_count(&self) -> usize {
        self.decimated.iter().filter(|&&d| d).count()
    }

    /// Matches of `[first, last]` as a string of symbols.
    pub fn match_string(&self, first: usize, last: usize) -> ProjectResult<String> {
        check_range(first, last, self.frame_count())?;
        Ok(self.matches[first..=last].iter().map(Match::as_char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectError;

    #[test]
    fn new_table_is_all_c() {
        let table = FrameDecisionTable::new(10);
        assert_eq!(table.frame_count(), 10);
        assert!(table.matches().iter().all(|&m| m == Match::C));
        assert_eq!(table.decimated_count(), 0);
    }

    #[test]
    fn cycling_three_times_returns_to_c() {
        let mut table = FrameDecisionTable::new(3);
        for expected in [Match::B, Match::N, Match::C] {
            assert!(table.cycle_match(1).unwrap());
            assert_eq!(table.get_match(1).unwrap(), expected);
        }
    }

    #[test]
    fn cycling_p_and_u_is_noop() {
        let mut table = FrameDecisionTable::new(3);
        table.set_match(0, Match::P).unwrap();
        table.set_match(2, Match::U).unwrap();

        assert!(!table.cycle_match(0).unwrap());
        assert!(!table.cycle_match(2).unwrap());
        assert_eq!(table.get_match(0).unwrap(), Match::P);
        assert_eq!(table.get_match(2).unwrap(), Match::U);
    }

    #[test]
    fn out_of_range_frames_fail() {
        let mut table = FrameDecisionTable::new(5);
        assert!(matches!(
            table.get_match(5),
            Err(ProjectError::OutOfRange { value: 5, limit: 5, .. })
        ));
        assert!(table.set_match(7, Match::N).is_err());
        assert!(table.cycle_match(5).is_err());
        assert!(table.is_decimated(5).is_err());
        assert!(table.set_decimated(9, true).is_err());
    }

    #[test]
    fn from_parts_validates_decimated_frames() {
        let table = FrameDecisionTable::from_parts(vec![Match::C; 6], [4, 1]).unwrap();
        assert_eq!(table.decimated_frames(), vec![1, 4]);

        assert!(FrameDecisionTable::from_parts(vec![Match::C; 6], [6]).is_err());
    }

    #[test]
    fn set_reports_change() {
        let mut table = FrameDecisionTable::new(4);
        assert!(table.set_decimated(2, true).unwrap());
        assert!(!table.set_decimated(2, true).unwrap());
        assert!(!table.set_match(0, Match::C).unwrap());
        assert_eq!(table.match_string(0, 3).unwrap(), "cccc");
    }
}
