//! The undoable part of a project.

use crate::annotations::{BookmarkSet, CombedFrameSet, FreezeFrameSet};
use crate::custom_lists::CustomListCollection;
use crate::frames::FrameDecisionTable;
use crate::models::OutputSettings;
use crate::patterns::PatternGuessingState;
use crate::presets::PresetCollection;
use crate::sections::SectionTable;

/// Everything undo and redo restore.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectState {
    pub(crate) decisions: FrameDecisionTable,
    pub(crate) sections: SectionTable,
    pub(crate) presets: PresetCollection,
    pub(crate) custom_lists: CustomListCollection,
    pub(crate) freeze_frames: FreezeFrameSet,
    pub(crate) bookmarks: BookmarkSet,
    pub(crate) combed: CombedFrameSet,
    pub(crate) guessing: PatternGuessingState,
    pub(crate) output: OutputSettings,
}

impl ProjectState {
    /// Fresh state: all `c`, nothing decimated, one section.
    pub fn new(frame_count: usize) -> Self {
        Self {
            decisions: FrameDecisionTable::new(frame_count),
            sections: SectionTable::new(frame_count),
            presets: PresetCollection::new(),
            custom_lists: CustomListCollection::new(),
            freeze_frames: FreezeFrameSet::new(),
            bookmarks: BookmarkSet::new(),
            combed: CombedFrameSet::new(),
            guessing: PatternGuessingState::default(),
            output: OutputSettings::default(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.decisions.frame_count()
    }

    pub fn decisions(&self) -> &FrameDecisionTable {
        &self.decisions
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn presets(&self) -> &PresetCollection {
        &self.presets
    }

    pub fn custom_lists(&self) -> &CustomListCollection {
        &self.custom_lists
    }

    pub fn freeze_frames(&self) -> &FreezeFrameSet {
        &self.freeze_frames
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn combed_frames(&self) -> &CombedFrameSet {
        &self.combed
    }

    pub fn guessing(&self) -> &PatternGuessingState {
        &self.guessing
    }

    pub fn output_settings(&self) -> &OutputSettings {
        &self.output
    }
}
