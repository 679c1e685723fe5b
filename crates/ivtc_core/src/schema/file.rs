//! On-disk layout of a project.

use serde::{Deserialize, Serialize};

use crate::custom_lists::CustomList;
use crate::metrics::FrameMetrics;
use crate::models::{Bookmark, FreezeFrame, OutputSettings, SourceInfo};
use crate::patterns::PatternGuessingState;
use crate::presets::Preset;
use crate::project::{Project, UiState};
use crate::sections::Section;

/// Project file format version.
pub const CURRENT_VERSION: u32 = 1;

/// Everything a project file holds.
///
/// Per-frame matches are stored as one string with a symbol per frame;
/// decimation as the list of decimated frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Project format version.
    pub version: u32,
    pub source: SourceInfo,
    pub matches: String,
    #[serde(default)]
    pub decimated_frames: Vec<usize>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub custom_lists: Vec<CustomList>,
    #[serde(default)]
    pub freeze_frames: Vec<FreezeFrame>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub combed_frames: Vec<usize>,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub pattern_guessing: PatternGuessingState,
    #[serde(default)]
    pub metrics: FrameMetrics,
    #[serde(default)]
    pub ui: UiState,
}

impl ProjectFile {
    /// Snapshot the persistent parts of a project.
    pub fn from_project(project: &Project) -> Self {
        let state = project.state();
        let decisions = state.decisions();
        Self {
            version: CURRENT_VERSION,
            source: project.source().clone(),
            matches: decisions.matches().iter().map(|m| m.as_char()).collect(),
            decimated_frames: decisions.decimated_frames(),
            sections: state.sections().iter().cloned().collect(),
            presets: state.presets().iter().cloned().collect(),
            custom_lists: state.custom_lists().iter().cloned().collect(),
            freeze_frames: state.freeze_frames().iter().copied().collect(),
            bookmarks: state.bookmarks().iter().cloned().collect(),
            combed_frames: state.combed_frames().iter().collect(),
            output: state.output_settings().clone(),
            pattern_guessing: state.guessing().clone(),
            metrics: project.metrics().clone(),
            ui: project.ui().clone(),
        }
    }
}
