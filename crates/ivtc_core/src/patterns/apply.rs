//! Writing patterns into the decision table.

use crate::error::{check_range, ProjectError, ProjectResult};
use crate::frames::{FrameDecisionTable, CYCLE};
use crate::models::{parse_decimation_pattern, parse_match_pattern, FrameRange, Match};
use crate::sections::SectionTable;

use super::guess::SectionGuess;

/// Whether `m` can be written at `frame` without borrowing a field from
/// outside the clip.
fn allowed_at(frame: usize, frame_count: usize, m: Match) -> bool {
    match m {
        Match::P | Match::B => frame > 0,
        Match::N | Match::U => frame + 1 < frame_count,
        Match::C => true,
    }
}

fn check_pattern_length(pattern: &str) -> ProjectResult<()> {
    if pattern.chars().count() < CYCLE {
        return Err(ProjectError::invalid_pattern(
            pattern,
            format!("pattern must be at least {} characters long", CYCLE),
        ));
    }
    Ok(())
}

/// Apply a match pattern over `range`.
///
/// The pattern's phase for each frame is its distance from the start of
/// the section containing it. Frame 0 never receives `p`/`b` and the last
/// frame never receives `n`/`u`; those frames keep their match.
///
/// Returns whether any match changed.
pub fn apply_match_pattern(
    decisions: &mut FrameDecisionTable,
    sections: &SectionTable,
    range: FrameRange,
    pattern: &str,
) -> ProjectResult<bool> {
    let frame_count = decisions.frame_count();
    check_pattern_length(pattern)?;
    let parsed = parse_match_pattern(pattern)?;
    check_range(range.first, range.last, frame_count)?;

    let mut changed = false;
    for_each_phase(sections, range, parsed.len(), |frame, phase| {
        let m = parsed[phase];
        if allowed_at(frame, frame_count, m) {
            changed |= decisions.set_match(frame, m)?;
        }
        Ok(())
    })?;

    tracing::debug!("Applied match pattern '{}' to {}", pattern, range);
    Ok(changed)
}

/// Apply a decimation pattern over `k` (keep) and `d` (drop) to `range`.
///
/// Returns whether any flag changed.
pub fn apply_decimation_pattern(
    decisions: &mut FrameDecisionTable,
    sections: &SectionTable,
    range: FrameRange,
    pattern: &str,
) -> ProjectResult<bool> {
    check_pattern_length(pattern)?;
    let parsed = parse_decimation_pattern(pattern)?;
    check_range(range.first, range.last, decisions.frame_count())?;

    let mut changed = false;
    for_each_phase(sections, range, parsed.len(), |frame, phase| {
        changed |= decisions.set_decimated(frame, parsed[phase])?;
        Ok(())
    })?;

    tracing::debug!("Applied decimation pattern '{}' to {}", pattern, range);
    Ok(changed)
}

/// Write a guessed section back. Returns `(matches changed, decimation changed)`.
pub fn apply_section_guess(
    decisions: &mut FrameDecisionTable,
    guess: &SectionGuess,
) -> ProjectResult<(bool, bool)> {
    let frame_count = decisions.frame_count();
    let mut matches_changed = false;
    let mut decimation_changed = false;

    for (i, (&m, &dropped)) in guess.matches.iter().zip(&guess.decimated).enumerate() {
        let frame = guess.section_start + i;
        if allowed_at(frame, frame_count, m) {
            matches_changed |= decisions.set_match(frame, m)?;
        }
        decimation_changed |= decisions.set_decimated(frame, dropped)?;
    }

    Ok((matches_changed, decimation_changed))
}

/// Visit every frame of `range` with its phase relative to its section.
fn for_each_phase(
    sections: &SectionTable,
    range: FrameRange,
    length: usize,
    mut visit: impl FnMut(usize, usize) -> ProjectResult<()>,
) -> ProjectResult<()> {
    let mut frame = range.first;
    while frame <= range.last {
        let section = sections.range_containing(frame)?;
        let stop = section.last.min(range.last);
        for f in frame..=stop {
            visit(f, (f - section.first) % length)?;
        }
        frame = stop + 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(frame_count: usize) -> (FrameDecisionTable, SectionTable) {
        (
            FrameDecisionTable::new(frame_count),
            SectionTable::new(frame_count),
        )
    }

    #[test]
    fn cccnn_kkkkd_over_fifteen_frames() {
        let (mut decisions, sections) = setup(16);
        let range = FrameRange::new(0, 14);

        assert!(apply_match_pattern(&mut decisions, &sections, range, "cccnn").unwrap());
        assert!(apply_decimation_pattern(&mut decisions, &sections, range, "kkkkd").unwrap());

        assert_eq!(decisions.match_string(0, 14).unwrap(), "cccnncccnncccnn");
        assert_eq!(decisions.decimated_frames(), vec![4, 9, 14]);
    }

    #[test]
    fn phase_follows_containing_section() {
        let (mut decisions, mut sections) = setup(20);
        sections.add_section(7).unwrap();

        apply_decimation_pattern(&mut decisions, &sections, FrameRange::new(0, 19), "kkkkd")
            .unwrap();
        assert_eq!(decisions.decimated_frames(), vec![4, 11, 16]);
    }

    #[test]
    fn phase_is_relative_to_section_not_range() {
        let (mut decisions, sections) = setup(20);
        apply_match_pattern(&mut decisions, &sections, FrameRange::new(3, 7), "nnccc").unwrap();
        // frames 3..=7 have section phases 3,4,0,1,2
        assert_eq!(decisions.match_string(3, 7).unwrap(), "ccnnc");
    }

    #[test]
    fn clip_edges_keep_their_match() {
        let (mut decisions, sections) = setup(5);
        apply_match_pattern(&mut decisions, &sections, FrameRange::new(0, 4), "bcccn").unwrap();
        assert_eq!(decisions.match_string(0, 4).unwrap(), "ccccc");
    }

    #[test]
    fn one_pattern_leaves_other_table_alone() {
        let (mut decisions, sections) = setup(10);
        decisions.set_decimated(2, true).unwrap();
        apply_match_pattern(&mut decisions, &sections, FrameRange::new(0, 9), "ccnnn").unwrap();
        assert_eq!(decisions.decimated_frames(), vec![2]);
    }

    #[test]
    fn invalid_patterns_mutate_nothing() {
        let (mut decisions, sections) = setup(10);
        let before = decisions.clone();
        let range = FrameRange::new(0, 9);

        for pattern in ["ccc", "cccxn", ""] {
            assert!(matches!(
                apply_match_pattern(&mut decisions, &sections, range, pattern),
                Err(ProjectError::InvalidPattern { .. })
            ));
        }
        assert!(apply_decimation_pattern(&mut decisions, &sections, range, "kkkkx").is_err());
        assert!(apply_match_pattern(&mut decisions, &sections, FrameRange::new(0, 10), "cccnn")
            .is_err());
        assert_eq!(decisions, before);
    }
}
