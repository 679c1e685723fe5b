//! Pattern application and pattern guessing.
//!
//! - **apply**: write repeating match/decimation patterns over a range,
//!   phased relative to the containing section's start
//! - **config**: guessing parameters, stored failures and reports
//! - **cost**: pluggable cost functions for metric-based guessing
//! - **guess**: per-section guessing from matches or from metrics

mod apply;
mod config;
mod cost;
mod drops;
mod guess;

pub use apply::{apply_decimation_pattern, apply_match_pattern, apply_section_guess};
pub use config::{GuessConfig, GuessReport, PatternGuessingState};
pub use cost::{cost_function_for, CombinedCost, CostFunction, DMetricCost, MicCost};
pub use guess::{PatternGuesser, SectionGuess};
