//! Match and decimation mutators, pattern application and guessing.

use crate::changes::{Change, Changeset};
use crate::error::{check_range, ProjectResult};
use crate::models::{FrameRange, GuessFailure, Match};
use crate::patterns::{
    apply_decimation_pattern, apply_match_pattern, apply_section_guess, CostFunction,
    GuessConfig, GuessReport, PatternGuesser,
};

use super::Project;

impl Project {
    pub fn get_match(&self, frame: usize) -> ProjectResult<Match> {
        self.state.decisions.get_match(frame)
    }

    pub fn is_decimated(&self, frame: usize) -> ProjectResult<bool> {
        self.state.decisions.is_decimated(frame)
    }

    fn match_changed(&mut self, changed: bool, range: FrameRange) -> Changeset {
        if !changed {
            return Changeset::new();
        }
        self.decisions_changed(range, false);
        let mut changes = Changeset::of(Change::Matches(range));
        changes.push(Change::OrphanFields);
        changes
    }

    fn decimation_changed(&mut self, changed: bool, range: FrameRange) -> Changeset {
        if !changed {
            return Changeset::new();
        }
        self.decisions_changed(range, true);
        let mut changes = Changeset::of(Change::Decimation(range));
        changes.push(Change::OrphanFields);
        changes
    }

    pub fn set_match(&mut self, frame: usize, m: Match) -> ProjectResult<Changeset> {
        let changed = self.state.decisions.set_match(frame, m)?;
        Ok(self.match_changed(changed, FrameRange::single(frame)))
    }

    /// Advance a frame's match through `c -> b -> n -> c`; no-op for `p`/`u`.
    pub fn cycle_match(&mut self, frame: usize) -> ProjectResult<Changeset> {
        let changed = self.state.decisions.cycle_match(frame)?;
        Ok(self.match_changed(changed, FrameRange::single(frame)))
    }

    pub fn set_decimated(&mut self, frame: usize, decimated: bool) -> ProjectResult<Changeset> {
        let changed = self.state.decisions.set_decimated(frame, decimated)?;
        Ok(self.decimation_changed(changed, FrameRange::single(frame)))
    }

    pub fn toggle_decimation(&mut self, frame: usize) -> ProjectResult<Changeset> {
        let current = self.state.decisions.is_decimated(frame)?;
        self.set_decimated(frame, !current)
    }

    /// Apply a match pattern over `[first, last]`, phased per section.
    pub fn set_range_matches_from_pattern(
        &mut self,
        first: usize,
        last: usize,
        pattern: &str,
    ) -> ProjectResult<Changeset> {
        let range = FrameRange::new(first, last);
        let changed = apply_match_pattern(
            &mut self.state.decisions,
            &self.state.sections,
            range,
            pattern,
        )?;
        Ok(self.match_changed(changed, range))
    }

    /// Apply a `k`/`d` decimation pattern over `[first, last]`.
    pub fn set_range_decimation_from_pattern(
        &mut self,
        first: usize,
        last: usize,
        pattern: &str,
    ) -> ProjectResult<Changeset> {
        let range = FrameRange::new(first, last);
        let changed = apply_decimation_pattern(
            &mut self.state.decisions,
            &self.state.sections,
            range,
            pattern,
        )?;
        Ok(self.decimation_changed(changed, range))
    }

    pub fn set_section_matches_from_pattern(
        &mut self,
        section_start: usize,
        pattern: &str,
    ) -> ProjectResult<Changeset> {
        let range = self.state.sections.section_range(section_start)?;
        self.set_range_matches_from_pattern(range.first, range.last, pattern)
    }

    pub fn set_section_decimation_from_pattern(
        &mut self,
        section_start: usize,
        pattern: &str,
    ) -> ProjectResult<Changeset> {
        let range = self.state.sections.section_range(section_start)?;
        self.set_range_decimation_from_pattern(range.first, range.last, pattern)
    }

    /// Restore the field matcher's matches over `[first, last]`.
    pub fn reset_range_matches(&mut self, first: usize, last: usize) -> ProjectResult<Changeset> {
        check_range(first, last, self.frame_count())?;
        let mut changed = false;
        for frame in first..=last {
            let original = self.metrics.original_match(frame);
            changed |= self.state.decisions.set_match(frame, original)?;
        }
        Ok(self.match_changed(changed, FrameRange::new(first, last)))
    }

    pub fn reset_section_matches(&mut self, section_start: usize) -> ProjectResult<Changeset> {
        let range = self.state.sections.section_range(section_start)?;
        self.reset_range_matches(range.first, range.last)
    }

    // =========================================================================
    // Pattern guessing
    // =========================================================================

    /// Replace the guessing parameters used by the next run.
    pub fn set_guess_config(&mut self, config: GuessConfig) -> Changeset {
        if self.state.guessing.config == config {
            return Changeset::new();
        }
        self.state.guessing.config = config;
        Changeset::of(Change::PatternGuessing)
    }

    /// Guess the section starting at `section_start`.
    pub fn guess_section_patterns(
        &mut self,
        section_start: usize,
    ) -> ProjectResult<(GuessReport, Changeset)> {
        let section = self.state.sections.section_range(section_start)?;
        let config = self.state.guessing.config.clone();
        let report = {
            let guesser = PatternGuesser::new(&config, &self.metrics)?;
            collect_guesses(&guesser, self.state.decisions.matches(), &[section])
        };
        let changes = self.apply_guesses(&report)?;
        log_report(&config.method.to_string(), &report);
        Ok((report, changes))
    }

    /// Guess every section of the clip.
    ///
    /// Orphan fields are cleared first and re-derived afterwards.
    pub fn guess_project_patterns(&mut self) -> ProjectResult<(GuessReport, Changeset)> {
        let config = self.state.guessing.config.clone();
        let sections = self.state.sections.ranges();
        let report = {
            let guesser = PatternGuesser::new(&config, &self.metrics)?;
            collect_guesses(&guesser, self.state.decisions.matches(), &sections)
        };
        let changes = self.apply_project_guesses(&report)?;
        log_report(&config.method.to_string(), &report);
        Ok((report, changes))
    }

    /// Guess every section with a custom cost function.
    pub fn guess_project_patterns_with_cost(
        &mut self,
        cost: Box<dyn CostFunction>,
    ) -> ProjectResult<(GuessReport, Changeset)> {
        let config = self.state.guessing.config.clone();
        let sections = self.state.sections.ranges();
        let name = cost.name();
        let report = {
            let guesser = PatternGuesser::with_cost(&config, &self.metrics, cost)?;
            collect_guesses(&guesser, self.state.decisions.matches(), &sections)
        };
        let changes = self.apply_project_guesses(&report)?;
        log_report(name, &report);
        Ok((report, changes))
    }

    fn apply_project_guesses(&mut self, report: &GuessReport) -> ProjectResult<Changeset> {
        self.orphans.clear();
        let changes = self.apply_guesses(report)?;
        self.orphans
            .refresh(&self.state.decisions, &self.state.sections);
        Ok(changes)
    }

    fn apply_guesses(&mut self, report: &GuessReport) -> ProjectResult<Changeset> {
        let mut changes = Changeset::of(Change::PatternGuessing);
        for guess in &report.guessed {
            let (matches_changed, decimation_changed) =
                apply_section_guess(&mut self.state.decisions, guess)?;
            let range = guess.section();
            changes.extend(self.match_changed(matches_changed, range));
            changes.extend(self.decimation_changed(decimation_changed, range));
            self.state.guessing.clear_failure(guess.section_start);
        }
        for failure in &report.failures {
            self.state
                .guessing
                .set_failure(failure.section_start, failure.reason);
            tracing::warn!(
                "Pattern guessing failed for section at {}: {}",
                failure.section_start,
                failure.reason
            );
        }
        Ok(changes)
    }
}

/// Guess every section before anything is written.
fn collect_guesses(
    guesser: &PatternGuesser<'_>,
    matches: &[Match],
    sections: &[FrameRange],
) -> GuessReport {
    let mut report = GuessReport::default();
    for &section in sections {
        match guesser.guess(matches, section) {
            Ok(guess) => report.guessed.push(guess),
            Err(reason) => report.failures.push(GuessFailure {
                section_start: section.first,
                reason,
            }),
        }
    }
    report
}

fn log_report(method: &str, report: &GuessReport) {
    tracing::info!(
        "Guessed patterns from {}: {} sections guessed, {} failed",
        method,
        report.guessed.len(),
        report.failures.len()
    );
}
