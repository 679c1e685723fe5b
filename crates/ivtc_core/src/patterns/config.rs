//! Guessing parameters and results.

use serde::{Deserialize, Serialize};

use crate::models::{
    DropDuplicate, GuessFailure, GuessFailureReason, GuessMethod, PatternFamily, UseThirdNMatch,
};

use super::guess::SectionGuess;

/// Parameters for pattern guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessConfig {
    #[serde(default)]
    pub method: GuessMethod,

    /// Sections shorter than this are skipped.
    #[serde(default = "default_minimum_length")]
    pub minimum_length: usize,

    /// Frames ignored at each end of a section while scoring.
    #[serde(default)]
    pub edge_cutoff: usize,

    #[serde(default)]
    pub third_n_match: UseThirdNMatch,

    #[serde(default)]
    pub decimation: DropDuplicate,

    /// Families tried by metric-based guessing.
    #[serde(default = "default_use_patterns")]
    pub use_patterns: Vec<PatternFamily>,
}

fn default_minimum_length() -> usize {
    10
}

fn default_use_patterns() -> Vec<PatternFamily> {
    PatternFamily::ALL.to_vec()
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            method: GuessMethod::default(),
            minimum_length: default_minimum_length(),
            edge_cutoff: 0,
            third_n_match: UseThirdNMatch::default(),
            decimation: DropDuplicate::default(),
            use_patterns: default_use_patterns(),
        }
    }
}

/// Guessing parameters of the last run plus the failures it left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternGuessingState {
    #[serde(default)]
    pub config: GuessConfig,
    /// Sorted by section start, at most one per section.
    #[serde(default)]
    pub failures: Vec<GuessFailure>,
}

impl PatternGuessingState {
    pub fn failure(&self, section_start: usize) -> Option<&GuessFailure> {
        self.failures
            .binary_search_by_key(&section_start, |f| f.section_start)
            .ok()
            .map(|i| &self.failures[i])
    }

    pub(crate) fn set_failure(&mut self, section_start: usize, reason: GuessFailureReason) {
        let failure = GuessFailure {
            section_start,
            reason,
        };
        match self
            .failures
            .binary_search_by_key(&section_start, |f| f.section_start)
        {
            Ok(i) => self.failures[i] = failure,
            Err(i) => self.failures.insert(i, failure),
        }
    }

    pub(crate) fn clear_failure(&mut self, section_start: usize) -> bool {
        match self
            .failures
            .binary_search_by_key(&section_start, |f| f.section_start)
        {
            Ok(i) => {
                self.failures.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// First section after `frame` whose guess was ambiguous.
    pub fn find_next_ambiguous(&self, frame: usize) -> Option<usize> {
        self.failures
            .iter()
            .filter(|f| f.reason == GuessFailureReason::AmbiguousPattern)
            .map(|f| f.section_start)
            .find(|&start| start > frame)
    }

    /// Last section before `frame` whose guess was ambiguous.
    pub fn find_previous_ambiguous(&self, frame: usize) -> Option<usize> {
        self.failures
            .iter()
            .rev()
            .filter(|f| f.reason == GuessFailureReason::AmbiguousPattern)
            .map(|f| f.section_start)
            .find(|&start| start < frame)
    }
}

/// Outcome of one guessing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessReport {
    pub guessed: Vec<SectionGuess>,
    pub failures: Vec<GuessFailure>,
}

impl GuessReport {
    pub fn any_success(&self) -> bool {
        !self.guessed.is_empty()
    }
}
