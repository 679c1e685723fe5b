//! The project aggregate.
//!
//! `Project` owns every component and is the operation surface used by the
//! GUI, the CLI and tests. Mutators validate first, then change state and
//! return a [`Changeset`](crate::changes::Changeset); a failed call leaves the
//! project untouched. Nothing is committed to the undo journal
//! automatically: callers commit once per logical user action.
//!
//! Derived data (frame-number mapping, orphan fields) is rebuilt lazily the
//! first time it is asked for after a change.

mod annotations_ops;
mod decisions_ops;
mod history;
mod import;
mod lists_ops;
mod output_ops;
mod sections_ops;
mod state;
mod ui;

use std::cell::OnceCell;

use crate::annotations::{BookmarkSet, CombedFrameSet, FreezeFrameSet};
use crate::custom_lists::CustomListCollection;
use crate::error::{ProjectError, ProjectResult};
use crate::frames::{FrameDecisionTable, FrameNumberMapper, FrameRateBreakdown};
use crate::metrics::{c_match_sequences, group_fades, FrameMetrics};
use crate::models::{DecimationRange, FrameRange, OutputSettings, SourceInfo};
use crate::orphans::OrphanFieldCache;
use crate::patterns::PatternGuessingState;
use crate::presets::PresetCollection;
use crate::sections::SectionTable;
use crate::undo::{UndoJournal, DEFAULT_MAX_STEPS};

pub use import::ImportSelection;
pub use state::ProjectState;
pub use ui::{UiState, MAX_ZOOM, MIN_ZOOM};

/// A manual IVTC project.
#[derive(Debug)]
pub struct Project {
    state: ProjectState,
    source: SourceInfo,
    metrics: FrameMetrics,
    ui: UiState,
    journal: UndoJournal<ProjectState>,
    mapper: OnceCell<FrameNumberMapper>,
    orphans: OrphanFieldCache,
    modified: bool,
}

impl Project {
    /// Create a project for a source with `source.frame_count` frames.
    pub fn new(source: SourceInfo) -> ProjectResult<Self> {
        if source.frame_count == 0 {
            return Err(ProjectError::invalid_project("source has no frames"));
        }
        let state = ProjectState::new(source.frame_count);
        tracing::info!(
            "Created project for '{}' ({} frames)",
            source.path,
            source.frame_count
        );
        Ok(Self::from_parts(
            state,
            source,
            FrameMetrics::default(),
            UiState::default(),
            DEFAULT_MAX_STEPS,
        ))
    }

    /// Assemble a project from already validated parts.
    pub(crate) fn from_parts(
        state: ProjectState,
        source: SourceInfo,
        metrics: FrameMetrics,
        ui: UiState,
        max_undo_steps: usize,
    ) -> Self {
        let journal = UndoJournal::new(state.clone(), max_undo_steps);
        Self {
            state,
            source,
            metrics,
            ui,
            journal,
            mapper: OnceCell::new(),
            orphans: OrphanFieldCache::new(),
            modified: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.state.frame_count()
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// Replace the externally supplied metrics. Not undoable.
    pub fn set_metrics(&mut self, mut metrics: FrameMetrics) -> ProjectResult<()> {
        metrics.validate(self.frame_count())?;
        metrics.sort_fades();
        self.metrics = metrics;
        self.modified = true;
        Ok(())
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn decisions(&self) -> &FrameDecisionTable {
        &self.state.decisions
    }

    pub fn sections(&self) -> &SectionTable {
        &self.state.sections
    }

    pub fn presets(&self) -> &PresetCollection {
        &self.state.presets
    }

    pub fn custom_lists(&self) -> &CustomListCollection {
        &self.state.custom_lists
    }

    pub fn freeze_frames(&self) -> &FreezeFrameSet {
        &self.state.freeze_frames
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.state.bookmarks
    }

    pub fn combed_frames(&self) -> &CombedFrameSet {
        &self.state.combed
    }

    pub fn guessing(&self) -> &PatternGuessingState {
        &self.state.guessing
    }

    pub fn output_settings(&self) -> &OutputSettings {
        &self.state.output
    }

    // =========================================================================
    // Frame numbering
    // =========================================================================

    /// The source <-> output mapping, rebuilt if decimation changed.
    pub fn mapper(&self) -> &FrameNumberMapper {
        self.mapper
            .get_or_init(|| FrameNumberMapper::build(self.state.decisions.decimation_flags()))
    }

    pub fn output_frame_count(&self) -> usize {
        self.mapper().output_frame_count()
    }

    pub fn to_output(&self, source: usize) -> ProjectResult<usize> {
        self.mapper().to_output(source)
    }

    pub fn output_position(&self, source: usize) -> ProjectResult<usize> {
        self.mapper().output_position(source)
    }

    pub fn to_source(&self, output: usize) -> ProjectResult<usize> {
        self.mapper().to_source(output)
    }

    pub fn decimation_ranges(&self) -> Vec<DecimationRange> {
        self.mapper().decimation_ranges()
    }

    pub fn frame_rates(&self) -> FrameRateBreakdown {
        self.mapper().frame_rates()
    }

    // =========================================================================
    // Orphan fields and searches
    // =========================================================================

    /// Orphan fields of the whole clip, refreshed where stale.
    pub fn orphan_fields(&mut self) -> &OrphanFieldCache {
        if self.orphans.is_stale() {
            self.orphans
                .refresh(&self.state.decisions, &self.state.sections);
        }
        &self.orphans
    }

    /// Next frame after `frame` whose mic under its current match is at
    /// least `minimum`.
    pub fn find_next_high_mic(&self, frame: usize, minimum: i16) -> ProjectResult<Option<usize>> {
        self.metrics
            .find_next_high_mic(self.state.decisions.matches(), frame, minimum)
    }

    pub fn find_previous_high_mic(
        &self,
        frame: usize,
        minimum: i16,
    ) -> ProjectResult<Option<usize>> {
        self.metrics
            .find_previous_high_mic(self.state.decisions.matches(), frame, minimum)
    }

    pub fn find_next_high_dmetric(
        &self,
        frame: usize,
        minimum: i32,
    ) -> ProjectResult<Option<usize>> {
        self.metrics.find_next_high_dmetric(frame, minimum)
    }

    pub fn find_previous_high_dmetric(
        &self,
        frame: usize,
        minimum: i32,
    ) -> ProjectResult<Option<usize>> {
        self.metrics.find_previous_high_dmetric(frame, minimum)
    }

    /// Runs of at least `minimum` consecutive `c` matches.
    pub fn c_match_sequences(&self, minimum: usize) -> Vec<FrameRange> {
        c_match_sequences(self.state.decisions.matches(), minimum)
    }

    /// Interlaced fades grouped into ranges.
    pub fn interlaced_fade_ranges(&self, ignore_gaps: usize) -> Vec<FrameRange> {
        group_fades(&self.metrics.interlaced_fades, ignore_gaps)
    }

    pub fn find_next_ambiguous_pattern_section(&self, frame: usize) -> Option<usize> {
        self.state.guessing.find_next_ambiguous(frame)
    }

    pub fn find_previous_ambiguous_pattern_section(&self, frame: usize) -> Option<usize> {
        self.state.guessing.find_previous_ambiguous(frame)
    }

    // =========================================================================
    // Derived state invalidation
    // =========================================================================

    /// Matches or decimation changed somewhere in `range`.
    fn decisions_changed(&mut self, range: FrameRange, decimation: bool) {
        if decimation {
            self.mapper.take();
        }
        // Records of the neighbours may change too.
        let last = (range.last + 1).min(self.frame_count() - 1);
        self.orphans
            .invalidate(FrameRange::new(range.first.saturating_sub(1), last));
    }

    /// Section partition changed around `range`.
    fn sections_changed(&mut self, range: FrameRange) {
        self.orphans.invalidate(range);
    }

    fn everything_changed(&mut self) {
        self.mapper.take();
        self.orphans.invalidate_all();
    }
}
