//! Per-section pattern guessing.
//!
//! A candidate is a pattern family at one of five phases. Frame
//! `section.first + i` sits at cycle slot `(i + phase) % 5`. Scoring only
//! looks at the section trimmed by `edge_cutoff`, but the chosen pattern is
//! written over the whole section.
//!
//! Metric candidates are tried family by family in configured order, phase
//! by phase. Among equally cheap candidates the first one tried wins; a
//! section fails as ambiguous only when every candidate costs the same.

use std::cmp::Ordering;

use crate::error::{ProjectError, ProjectResult};
use crate::frames::CYCLE;
use crate::metrics::FrameMetrics;
use crate::models::{
    FrameRange, GuessFailureReason, GuessMethod, Match, PatternFamily, UseThirdNMatch,
};

use super::config::GuessConfig;
use super::cost::{cost_function_for, CostFunction};
use super::drops::choose_drops;

/// The guessed matches and drops of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGuess {
    pub section_start: usize,
    pub family: PatternFamily,
    pub phase: usize,
    /// One entry per frame of the section.
    pub matches: Vec<Match>,
    /// One entry per frame of the section.
    pub decimated: Vec<bool>,
}

impl SectionGuess {
    pub fn section(&self) -> FrameRange {
        FrameRange::new(
            self.section_start,
            self.section_start + self.matches.len() - 1,
        )
    }
}

/// Guesses sections with a fixed configuration and metric set.
pub struct PatternGuesser<'a> {
    config: &'a GuessConfig,
    metrics: &'a FrameMetrics,
    cost: Option<Box<dyn CostFunction>>,
}

impl<'a> PatternGuesser<'a> {
    /// Guesser for `config.method` with its default cost function.
    ///
    /// Fails with `MissingMetrics` before anything is guessed if the method
    /// needs metrics that were not supplied.
    pub fn new(config: &'a GuessConfig, metrics: &'a FrameMetrics) -> ProjectResult<Self> {
        match cost_function_for(config.method) {
            Some(cost) => Self::with_cost(config, metrics, cost),
            None => Ok(Self {
                config,
                metrics,
                cost: None,
            }),
        }
    }

    /// Metric-based guesser with a custom cost function.
    pub fn with_cost(
        config: &'a GuessConfig,
        metrics: &'a FrameMetrics,
        cost: Box<dyn CostFunction>,
    ) -> ProjectResult<Self> {
        cost.check(metrics)?;
        if config.use_patterns.is_empty() {
            return Err(ProjectError::invalid_pattern(
                "",
                "no pattern families enabled for guessing",
            ));
        }
        Ok(Self {
            config,
            metrics,
            cost: Some(cost),
        })
    }

    pub fn method(&self) -> GuessMethod {
        self.config.method
    }

    /// Guess one section. `matches` is the whole clip's current matches.
    pub fn guess(
        &self,
        matches: &[Match],
        section: FrameRange,
    ) -> Result<SectionGuess, GuessFailureReason> {
        let trimmed = self
            .trimmed(section)
            .ok_or(GuessFailureReason::SectionTooShort)?;

        match &self.cost {
            None => self.guess_from_matches(matches, section, trimmed),
            Some(cost) => self.guess_from_metrics(cost.as_ref(), section, trimmed),
        }
    }

    fn trimmed(&self, section: FrameRange) -> Option<FrameRange> {
        let cut = self.config.edge_cutoff;
        let needed = cut.saturating_mul(2).saturating_add(CYCLE);
        if section.len() < self.config.minimum_length || section.len() < needed {
            return None;
        }
        Some(FrameRange::new(section.first + cut, section.last - cut))
    }

    fn guess_from_matches(
        &self,
        matches: &[Match],
        section: FrameRange,
        trimmed: FrameRange,
    ) -> Result<SectionGuess, GuessFailureReason> {
        let expected = PatternFamily::Cccnn.matches();

        let scores: Vec<usize> = (0..CYCLE)
            .map(|phase| {
                (trimmed.first..=trimmed.last)
                    .filter(|&frame| {
                        let slot = (frame - section.first + phase) % CYCLE;
                        let m = matches.get(frame).copied().unwrap_or_default();
                        m == expected[slot] || (slot == 2 && m == Match::N)
                    })
                    .count()
            })
            .collect();

        let best = scores.iter().copied().max().unwrap_or(0);
        if best == 0 || scores.iter().filter(|&&s| s == best).count() > 1 {
            tracing::debug!(
                "Section at {} has no unique best phase (scores {:?})",
                section.first,
                scores
            );
            return Err(GuessFailureReason::AmbiguousPattern);
        }
        let phase = scores.iter().position(|&s| s == best).unwrap_or(0);

        let assigned: Vec<Match> = (section.first..=section.last)
            .map(|frame| {
                let slot = (frame - section.first + phase) % CYCLE;
                if slot == 2 {
                    self.third_match(frame)
                } else {
                    expected[slot]
                }
            })
            .collect();

        let mic = |frame: usize, m: Match| -> i64 {
            self.metrics.mic(frame, m).map(i64::from).unwrap_or(0)
        };
        let ugliness = self.metrics.has_mics().then_some(&mic as &dyn Fn(usize, Match) -> i64);
        let decimated = choose_drops(section, phase, &assigned, self.config.decimation, ugliness);

        let family = match self.config.third_n_match {
            UseThirdNMatch::Always => PatternFamily::Ccnnn,
            _ => PatternFamily::Cccnn,
        };

        Ok(SectionGuess {
            section_start: section.first,
            family,
            phase,
            matches: assigned,
            decimated,
        })
    }

    /// Match for the third slot of a `cccnn` cycle.
    fn third_match(&self, frame: usize) -> Match {
        match self.config.third_n_match {
            UseThirdNMatch::Always => Match::N,
            UseThirdNMatch::Never => Match::C,
            UseThirdNMatch::IfPrettier => {
                match (
                    self.metrics.mic(frame, Match::N),
                    self.metrics.mic(frame, Match::C),
                ) {
                    (Some(n), Some(c)) if n < c => Match::N,
                    _ => Match::C,
                }
            }
        }
    }

    fn guess_from_metrics(
        &self,
        cost: &dyn CostFunction,
        section: FrameRange,
        trimmed: FrameRange,
    ) -> Result<SectionGuess, GuessFailureReason> {
        let ugliness = |frame: usize, m: Match| cost.cost(self.metrics, frame, m);

        let mut best: Option<Candidate> = None;
        // Cost of the first candidate, to tell a flat section apart.
        let mut baseline: Option<(i128, i128)> = None;
        let mut flat = true;

        for family in unique_families(&self.config.use_patterns) {
            let pattern = family.matches();
            for phase in 0..CYCLE {
                let assigned: Vec<Match> = (0..section.len())
                    .map(|i| pattern[(i + phase) % CYCLE])
                    .collect();
                let decimated = choose_drops(
                    section,
                    phase,
                    &assigned,
                    self.config.decimation,
                    Some(&ugliness),
                );

                let (total, kept) = (trimmed.first..=trimmed.last)
                    .map(|frame| frame - section.first)
                    .filter(|&i| !decimated[i])
                    .fold((0i128, 0i128), |(total, kept), i| {
                        let cost = ugliness(section.first + i, assigned[i]);
                        (total + i128::from(cost), kept + 1)
                    });
                if kept == 0 {
                    continue;
                }

                match baseline {
                    None => baseline = Some((total, kept)),
                    Some((base_total, base_kept)) => {
                        if total * base_kept != base_total * kept {
                            flat = false;
                        }
                    }
                }

                let candidate = Candidate {
                    family,
                    phase,
                    assigned,
                    decimated,
                    total,
                    kept,
                };
                let better = best
                    .as_ref()
                    .map_or(true, |current| candidate.compare_mean(current) == Ordering::Less);
                if better {
                    best = Some(candidate);
                }
            }
        }

        let best = best.ok_or(GuessFailureReason::AmbiguousPattern)?;
        if flat {
            tracing::debug!(
                "Section at {} has the same cost {}/{} under every candidate",
                section.first,
                best.total,
                best.kept
            );
            return Err(GuessFailureReason::AmbiguousPattern);
        }

        Ok(SectionGuess {
            section_start: section.first,
            family: best.family,
            phase: best.phase,
            matches: best.assigned,
            decimated: best.decimated,
        })
    }
}

/// Enabled families in configured order, each once.
fn unique_families(families: &[PatternFamily]) -> Vec<PatternFamily> {
    let mut unique = Vec::with_capacity(families.len());
    for &family in families {
        if !unique.contains(&family) {
            unique.push(family);
        }
    }
    unique
}

struct Candidate {
    family: PatternFamily,
    phase: usize,
    assigned: Vec<Match>,
    decimated: Vec<bool>,
    total: i128,
    kept: i128,
}

impl Candidate {
    /// Compare mean costs exactly.
    fn compare_mean(&self, other: &Candidate) -> Ordering {
        (self.total * other.kept).cmp(&(other.total * self.kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_match_pattern, DropDuplicate};

    fn dropped(flags: &[bool], offset: usize) -> Vec<usize> {
        flags
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| d.then_some(i + offset))
            .collect()
    }

    fn pattern_string(matches: &[Match]) -> String {
        matches.iter().map(Match::as_char).collect()
    }

    fn telecined_mics(frame_count: usize) -> Vec<[i16; 5]> {
        // p, c, n, b, u per frame; true pattern cccnn from frame 0
        (0..frame_count)
            .map(|frame| match frame % 5 {
                0..=2 => [60, 0, 50, 60, 60],
                3 => [60, 50, 0, 60, 60],
                _ => [60, 50, 3, 60, 60],
            })
            .collect()
    }

    #[test]
    fn too_short_sections_fail() {
        let config = GuessConfig::default();
        let metrics = FrameMetrics::default();
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        let matches = vec![Match::C; 9];
        assert_eq!(
            guesser.guess(&matches, FrameRange::new(0, 8)),
            Err(GuessFailureReason::SectionTooShort)
        );
    }

    #[test]
    fn edge_cutoff_can_make_section_too_short() {
        let config = GuessConfig {
            minimum_length: 5,
            edge_cutoff: 3,
            ..Default::default()
        };
        let metrics = FrameMetrics::default();
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        let matches = parse_match_pattern("cccnncccnn").unwrap();
        assert_eq!(
            guesser.guess(&matches, FrameRange::new(0, 9)),
            Err(GuessFailureReason::SectionTooShort)
        );
    }

    #[test]
    fn from_matches_finds_phase() {
        let config = GuessConfig {
            third_n_match: UseThirdNMatch::Never,
            decimation: DropDuplicate::DropFirstDuplicate,
            ..Default::default()
        };
        let metrics = FrameMetrics::default();
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();

        // section starts at 2; the pattern is offset by two frames
        let mut matches = vec![Match::C; 2];
        matches.extend(parse_match_pattern("nncccnncccnncccnnccc").unwrap());
        let guess = guesser.guess(&matches, FrameRange::new(2, 21)).unwrap();

        assert_eq!(guess.phase, 3);
        assert_eq!(pattern_string(&guess.matches), "nncccnncccnncccnnccc");
        assert_eq!(dropped(&guess.decimated, 2), vec![3, 8, 13, 18]);
    }

    #[test]
    fn from_matches_third_n_policies() {
        let matches = parse_match_pattern("cccnncccnn").unwrap();
        let metrics = FrameMetrics {
            // frame 2 prefers n, frame 7 prefers c
            mics: Some(
                (0..10)
                    .map(|f| match f {
                        2 => [9, 20, 5, 9, 9],
                        7 => [9, 5, 20, 9, 9],
                        _ => [9, 9, 9, 9, 9],
                    })
                    .collect(),
            ),
            ..Default::default()
        };

        let mut config = GuessConfig::default();
        let section = FrameRange::new(0, 9);

        config.third_n_match = UseThirdNMatch::Always;
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!(pattern_string(&guess.matches), "ccnnnccnnn");

        config.third_n_match = UseThirdNMatch::IfPrettier;
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!(pattern_string(&guess.matches), "ccnnncccnn");

        let no_mics = FrameMetrics::default();
        let guess = PatternGuesser::new(&config, &no_mics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!(pattern_string(&guess.matches), "cccnncccnn");
    }

    #[test]
    fn from_matches_all_c_is_ambiguous() {
        let config = GuessConfig::default();
        let metrics = FrameMetrics::default();
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        let matches = vec![Match::C; 20];
        assert_eq!(
            guesser.guess(&matches, FrameRange::new(0, 19)),
            Err(GuessFailureReason::AmbiguousPattern)
        );
    }

    #[test]
    fn from_mics_picks_cheapest_candidate() {
        let config = GuessConfig {
            method: GuessMethod::FromMics,
            ..Default::default()
        };
        let metrics = FrameMetrics {
            mics: Some(telecined_mics(20)),
            ..Default::default()
        };
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        let guess = guesser
            .guess(&vec![Match::C; 20], FrameRange::new(0, 19))
            .unwrap();

        assert_eq!(guess.family, PatternFamily::Cccnn);
        assert_eq!(guess.phase, 0);
        assert_eq!(dropped(&guess.decimated, 0), vec![4, 9, 14, 19]);
        assert_eq!(
            pattern_string(&guess.matches[..19]),
            "cccnncccnncccnncccn"
        );
    }

    #[test]
    fn from_mics_flat_metrics_are_ambiguous() {
        let config = GuessConfig {
            method: GuessMethod::FromMics,
            decimation: DropDuplicate::DropFirstDuplicate,
            ..Default::default()
        };
        let metrics = FrameMetrics {
            mics: Some(vec![[1, 1, 1, 1, 1]; 20]),
            ..Default::default()
        };
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        assert_eq!(
            guesser.guess(&vec![Match::C; 20], FrameRange::new(0, 19)),
            Err(GuessFailureReason::AmbiguousPattern)
        );
    }

    /// Mics `[p, c, n, b, u]` that are clean for `truth` at `phase`.
    fn clean_mics(truth: PatternFamily, phase: usize, frame_count: usize) -> Vec<[i16; 5]> {
        let pattern = truth.matches();
        (0..frame_count)
            .map(|i| match pattern[(i + phase) % 5] {
                Match::N => [60, 50, 0, 60, 60],
                _ => [60, 0, 50, 60, 60],
            })
            .collect()
    }

    /// DMetrics mmetrics `[p, c, n]` that are clean for `truth` at `phase`.
    fn clean_mmetrics(truth: PatternFamily, phase: usize, frame_count: usize) -> Vec<[i32; 3]> {
        let pattern = truth.matches();
        (0..frame_count)
            .map(|i| match pattern[(i + phase) % 5] {
                Match::N => [40, 40, 0],
                _ => [40, 0, 40],
            })
            .collect()
    }

    #[test]
    fn from_dmetrics_clean_telecine_takes_first_cheapest() {
        // cccnn at phase 2 and ccnnn at phase 1 both cost nothing here
        let config = GuessConfig {
            method: GuessMethod::FromDMetrics,
            decimation: DropDuplicate::DropFirstDuplicate,
            ..Default::default()
        };
        let metrics = FrameMetrics {
            mmetrics: Some(clean_mmetrics(PatternFamily::Cccnn, 2, 30)),
            ..Default::default()
        };
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&vec![Match::C; 30], FrameRange::new(0, 29))
            .unwrap();

        assert_eq!(guess.family, PatternFamily::Cccnn);
        assert_eq!(guess.phase, 2);
        assert_eq!(
            pattern_string(&guess.matches),
            "cnncccnncccnncccnncccnncccnncc"
        );
        assert_eq!(dropped(&guess.decimated, 0), vec![2, 7, 12, 17, 22, 27]);
    }

    #[test]
    fn from_mics_and_dmetrics_finds_ccnnn() {
        let config = GuessConfig {
            method: GuessMethod::FromMicsAndDMetrics,
            decimation: DropDuplicate::DropFirstDuplicate,
            ..Default::default()
        };
        let metrics = FrameMetrics {
            mics: Some(clean_mics(PatternFamily::Ccnnn, 0, 20)),
            mmetrics: Some(clean_mmetrics(PatternFamily::Ccnnn, 0, 20)),
            ..Default::default()
        };
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&vec![Match::C; 20], FrameRange::new(0, 19))
            .unwrap();

        assert_eq!(guess.family, PatternFamily::Ccnnn);
        assert_eq!(guess.phase, 0);
        assert_eq!(pattern_string(&guess.matches), "ccnnnccnnnccnnnccnnn");
        assert_eq!(dropped(&guess.decimated, 0), vec![4, 9, 14, 19]);
    }

    #[test]
    fn equal_cost_families_follow_configured_order() {
        // ccccn at phase 0 and ccccc at phases 0 and 1 all cost nothing
        let metrics = FrameMetrics {
            mics: Some(clean_mics(PatternFamily::Ccccn, 0, 20)),
            ..Default::default()
        };
        let section = FrameRange::new(0, 19);
        let matches = vec![Match::C; 20];

        let mut config = GuessConfig {
            method: GuessMethod::FromMics,
            decimation: DropDuplicate::DropUglierPerSection,
            use_patterns: vec![PatternFamily::Ccccn, PatternFamily::Ccccc],
            ..Default::default()
        };
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!(guess.family, PatternFamily::Ccccn);
        assert_eq!(guess.phase, 0);
        assert_eq!(pattern_string(&guess.matches), "ccccnccccnccccnccccn");
        assert_eq!(dropped(&guess.decimated, 0), vec![4, 9, 14, 19]);

        config.use_patterns = vec![PatternFamily::Ccccc, PatternFamily::Ccccn];
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!(guess.family, PatternFamily::Ccccc);
        assert_eq!(guess.phase, 0);
        assert_eq!(pattern_string(&guess.matches), "cccccccccccccccccccc");
        assert_eq!(dropped(&guess.decimated, 0), vec![4, 9, 14, 19]);
    }

    #[test]
    fn repeated_families_are_searched_once() {
        assert_eq!(
            unique_families(&[
                PatternFamily::Cccnn,
                PatternFamily::Ccnnn,
                PatternFamily::Cccnn,
                PatternFamily::Ccnnn,
            ]),
            vec![PatternFamily::Cccnn, PatternFamily::Ccnnn]
        );
    }

    #[test]
    fn uglier_duplicate_policies_through_guesser() {
        let mut mics = clean_mics(PatternFamily::Cccnn, 0, 20);
        // second duplicate of cycle 0 and first duplicate of cycle 1 are uglier
        mics[5][1] = 6;
        mics[9][2] = 7;
        let metrics = FrameMetrics {
            mics: Some(mics),
            ..Default::default()
        };
        let section = FrameRange::new(0, 19);
        let matches = vec![Match::C; 20];

        let mut config = GuessConfig {
            method: GuessMethod::FromMics,
            decimation: DropDuplicate::DropUglierPerCycle,
            ..Default::default()
        };
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!((guess.family, guess.phase), (PatternFamily::Cccnn, 0));
        assert_eq!(dropped(&guess.decimated, 0), vec![5, 9, 14, 19]);

        // 7 on the first side outweighs 6 on the second
        config.decimation = DropDuplicate::DropUglierPerSection;
        let guess = PatternGuesser::new(&config, &metrics)
            .unwrap()
            .guess(&matches, section)
            .unwrap();
        assert_eq!((guess.family, guess.phase), (PatternFamily::Cccnn, 0));
        assert_eq!(dropped(&guess.decimated, 0), vec![4, 9, 14, 19]);
    }

    #[test]
    fn huge_edge_cutoff_is_too_short() {
        let config = GuessConfig {
            edge_cutoff: usize::MAX,
            ..Default::default()
        };
        let metrics = FrameMetrics::default();
        let guesser = PatternGuesser::new(&config, &metrics).unwrap();
        assert_eq!(
            guesser.guess(&vec![Match::C; 20], FrameRange::new(0, 19)),
            Err(GuessFailureReason::SectionTooShort)
        );
    }

    #[test]
    fn metric_methods_need_metrics() {
        let metrics = FrameMetrics::default();
        for method in [
            GuessMethod::FromMics,
            GuessMethod::FromDMetrics,
            GuessMethod::FromMicsAndDMetrics,
        ] {
            let config = GuessConfig {
                method,
                ..Default::default()
            };
            assert!(matches!(
                PatternGuesser::new(&config, &metrics),
                Err(ProjectError::MissingMetrics(_))
            ));
        }
    }
}
