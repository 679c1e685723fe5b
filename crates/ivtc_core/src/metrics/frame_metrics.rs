//! Metric storage and lookups.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};
use crate::models::{InterlacedFade, Match};

/// All externally supplied metrics. Every present array has one entry per
/// source frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mics: Option<Vec<[i16; 5]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmetrics: Option<Vec<[i32; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmetrics: Option<Vec<[i32; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimate_metrics: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_matches: Option<Vec<Match>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interlaced_fades: Vec<InterlacedFade>,
}

fn check_len<T>(name: &str, values: &Option<Vec<T>>, frame_count: usize) -> ProjectResult<()> {
    match values {
        Some(values) if values.len() != frame_count => Err(ProjectError::invalid_project(format!(
            "{} has {} entries for {} frames",
            name,
            values.len(),
            frame_count
        ))),
        _ => Ok(()),
    }
}

impl FrameMetrics {
    /// Check every array against the frame count.
    pub fn validate(&self, frame_count: usize) -> ProjectResult<()> {
        check_len("mics", &self.mics, frame_count)?;
        check_len("mmetrics", &self.mmetrics, frame_count)?;
        check_len("vmetrics", &self.vmetrics, frame_count)?;
        check_len("decimate_metrics", &self.decimate_metrics, frame_count)?;
        check_len("original_matches", &self.original_matches, frame_count)?;
        if let Some(fade) = self.interlaced_fades.iter().find(|f| f.frame >= frame_count) {
            return Err(ProjectError::invalid_project(format!(
                "interlaced fade at frame {} is past the last frame",
                fade.frame
            )));
        }
        Ok(())
    }

    pub fn has_mics(&self) -> bool {
        self.mics.is_some()
    }

    pub fn has_dmetrics(&self) -> bool {
        self.mmetrics.is_some() && self.vmetrics.is_some()
    }

    pub fn has_decimate_metrics(&self) -> bool {
        self.decimate_metrics.is_some()
    }

    pub fn require_mics(&self) -> ProjectResult<&[[i16; 5]]> {
        self.mics
            .as_deref()
            .ok_or_else(|| ProjectError::MissingMetrics("mics".to_string()))
    }

    pub fn require_mmetrics(&self) -> ProjectResult<&[[i32; 3]]> {
        self.mmetrics
            .as_deref()
            .ok_or_else(|| ProjectError::MissingMetrics("dmetrics".to_string()))
    }

    pub fn require_decimate_metrics(&self) -> ProjectResult<&[i32]> {
        self.decimate_metrics
            .as_deref()
            .ok_or_else(|| ProjectError::MissingMetrics("decimate metrics".to_string()))
    }

    /// Mic of `frame` under `m`.
    pub fn mic(&self, frame: usize, m: Match) -> Option<i16> {
        self.mics
            .as_ref()
            .and_then(|mics| mics.get(frame))
            .map(|values| values[m.mic_index()])
    }

    /// DMetrics mmetric of `frame` under `m`.
    pub fn mmetric(&self, frame: usize, m: Match) -> Option<i32> {
        self.mmetrics
            .as_ref()
            .and_then(|values| values.get(frame))
            .map(|values| values[m.dmetric_index()])
    }

    /// DMetrics vmetric of `frame` under `m`.
    pub fn vmetric(&self, frame: usize, m: Match) -> Option<i32> {
        self.vmetrics
            .as_ref()
            .and_then(|values| values.get(frame))
            .map(|values| values[m.dmetric_index()])
    }

    pub fn decimate_metric(&self, frame: usize) -> Option<i32> {
        self.decimate_metrics
            .as_ref()
            .and_then(|values| values.get(frame))
            .copied()
    }

    /// The field matcher's match for `frame`, or `c` when none was supplied.
    pub fn original_match(&self, frame: usize) -> Match {
        self.original_matches
            .as_ref()
            .and_then(|values| values.get(frame))
            .copied()
            .unwrap_or(Match::C)
    }

    /// Next frame after `frame` whose mic under its current match is at
    /// least `minimum`.
    pub fn find_next_high_mic(
        &self,
        matches: &[Match],
        frame: usize,
        minimum: i16,
    ) -> ProjectResult<Option<usize>> {
        let mics = self.require_mics()?;
        Ok((frame + 1..mics.len().min(matches.len()))
            .find(|&f| mics[f][matches[f].mic_index()] >= minimum))
    }

    /// Previous frame before `frame` whose mic under its current match is
    /// at least `minimum`.
    pub fn find_previous_high_mic(
        &self,
        matches: &[Match],
        frame: usize,
        minimum: i16,
    ) -> ProjectResult<Option<usize>> {
        let mics = self.require_mics()?;
        let end = frame.min(mics.len()).min(matches.len());
        Ok((0..end)
            .rev()
            .find(|&f| mics[f][matches[f].mic_index()] >= minimum))
    }

    /// Next frame after `frame` whose decimate metric is at least `minimum`.
    pub fn find_next_high_dmetric(
        &self,
        frame: usize,
        minimum: i32,
    ) -> ProjectResult<Option<usize>> {
        let metrics = self.require_decimate_metrics()?;
        Ok((frame + 1..metrics.len()).find(|&f| metrics[f] >= minimum))
    }

    /// Previous frame before `frame` whose decimate metric is at least
    /// `minimum`.
    pub fn find_previous_high_dmetric(
        &self,
        frame: usize,
        minimum: i32,
    ) -> ProjectResult<Option<usize>> {
        let metrics = self.require_decimate_metrics()?;
        Ok((0..frame.min(metrics.len()))
            .rev()
            .find(|&f| metrics[f] >= minimum))
    }

    /// Interlaced fades after `frame`, as a navigation aid.
    pub fn find_next_fade(&self, frame: usize) -> Option<&InterlacedFade> {
        let index = self.interlaced_fades.partition_point(|f| f.frame <= frame);
        self.interlaced_fades.get(index)
    }

    pub(crate) fn sort_fades(&mut self) {
        self.interlaced_fades.sort_by_key(|fade| fade.frame);
        self.interlaced_fades.dedup_by_key(|fade| fade.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_mics() -> FrameMetrics {
        FrameMetrics {
            mics: Some(vec![
                [0, 5, 40, 0, 0],
                [0, 30, 2, 0, 0],
                [0, 1, 1, 0, 0],
                [0, 25, 25, 0, 0],
            ]),
            decimate_metrics: Some(vec![100, 2, 3000, 5]),
            ..Default::default()
        }
    }

    #[test]
    fn high_mic_uses_current_match() {
        let metrics = metrics_with_mics();
        let matches = [Match::N, Match::N, Match::C, Match::C];

        // frame 0 is n (40) but the search starts after it
        assert_eq!(metrics.find_next_high_mic(&matches, 0, 20).unwrap(), Some(3));
        assert_eq!(metrics.find_previous_high_mic(&matches, 3, 20).unwrap(), Some(0));
        assert_eq!(metrics.find_next_high_mic(&matches, 3, 20).unwrap(), None);
    }

    #[test]
    fn high_dmetric_search() {
        let metrics = metrics_with_mics();
        assert_eq!(metrics.find_next_high_dmetric(0, 1000).unwrap(), Some(2));
        assert_eq!(metrics.find_previous_high_dmetric(2, 50).unwrap(), Some(0));
        assert_eq!(metrics.find_next_high_dmetric(2, 1000).unwrap(), None);
    }

    #[test]
    fn searches_without_metrics_fail() {
        let metrics = FrameMetrics::default();
        assert!(matches!(
            metrics.find_next_high_mic(&[Match::C], 0, 1),
            Err(ProjectError::MissingMetrics(_))
        ));
        assert!(matches!(
            metrics.find_next_high_dmetric(0, 1),
            Err(ProjectError::MissingMetrics(_))
        ));
    }

    #[test]
    fn lookups_follow_match_indices() {
        let metrics = FrameMetrics {
            mmetrics: Some(vec![[7, 8, 9]]),
            original_matches: Some(vec![Match::N]),
            ..Default::default()
        };
        assert_eq!(metrics.mmetric(0, Match::B), Some(7));
        assert_eq!(metrics.mmetric(0, Match::U), Some(9));
        assert_eq!(metrics.mmetric(1, Match::C), None);
        assert_eq!(metrics.original_match(0), Match::N);
        assert_eq!(metrics.original_match(5), Match::C);
    }

    #[test]
    fn validate_checks_lengths() {
        let metrics = metrics_with_mics();
        assert!(metrics.validate(4).is_ok());
        assert!(matches!(
            metrics.validate(5),
            Err(ProjectError::InvalidProject(_))
        ));
    }
}
