//! Cost functions for metric-based guessing.
//!
//! Lower is better. A candidate's cost is the mean over its kept frames, so
//! implementations only score one frame under one match.

use crate::error::ProjectResult;
use crate::metrics::FrameMetrics;
use crate::models::{GuessMethod, Match};

pub trait CostFunction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fail with `MissingMetrics` if the inputs this function reads are absent.
    fn check(&self, metrics: &FrameMetrics) -> ProjectResult<()>;

    /// Cost of showing `frame` under match `m`.
    fn cost(&self, metrics: &FrameMetrics, frame: usize, m: Match) -> i64;
}

/// Combing of the assigned match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicCost;

impl CostFunction for MicCost {
    fn name(&self) -> &'static str {
        "mics"
    }

    fn check(&self, metrics: &FrameMetrics) -> ProjectResult<()> {
        metrics.require_mics().map(|_| ())
    }

    fn cost(&self, metrics: &FrameMetrics, frame: usize, m: Match) -> i64 {
        metrics.mic(frame, m).map(i64::from).unwrap_or(0)
    }
}

/// DMetrics mmetric of the assigned match.
#[derive(Debug, Clone, Copy, Default)]
pub struct DMetricCost;

impl CostFunction for DMetricCost {
    fn name(&self) -> &'static str {
        "dmetrics"
    }

    fn check(&self, metrics: &FrameMetrics) -> ProjectResult<()> {
        metrics.require_mmetrics().map(|_| ())
    }

    fn cost(&self, metrics: &FrameMetrics, frame: usize, m: Match) -> i64 {
        metrics.mmetric(frame, m).map(i64::from).unwrap_or(0)
    }
}

/// Weighted sum of mic and dmetric.
#[derive(Debug, Clone, Copy)]
pub struct CombinedCost {
    pub mic_weight: i64,
    pub dmetric_weight: i64,
}

impl Default for CombinedCost {
    fn default() -> Self {
        Self {
            mic_weight: 1,
            dmetric_weight: 1,
        }
    }
}

impl CostFunction for CombinedCost {
    fn name(&self) -> &'static str {
        "mics and dmetrics"
    }

    fn check(&self, metrics: &FrameMetrics) -> ProjectResult<()> {
        MicCost.check(metrics)?;
        DMetricCost.check(metrics)
    }

    fn cost(&self, metrics: &FrameMetrics, frame: usize, m: Match) -> i64 {
        self.mic_weight * MicCost.cost(metrics, frame, m)
            + self.dmetric_weight * DMetricCost.cost(metrics, frame, m)
    }
}

/// The default cost function for a guessing method; `None` for guessing
/// from matches.
pub fn cost_function_for(method: GuessMethod) -> Option<Box<dyn CostFunction>> {
    match method {
        GuessMethod::FromMatches => None,
        GuessMethod::FromMics => Some(Box::new(MicCost)),
        GuessMethod::FromDMetrics => Some(Box::new(DMetricCost)),
        GuessMethod::FromMicsAndDMetrics => Some(Box::new(CombinedCost::default())),
    }
}
