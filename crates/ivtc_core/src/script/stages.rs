//! The pipeline description value object.

use serde::{Deserialize, Serialize};

use crate::models::{FrameRange, FreezeFrame, PositionInFilterChain};
use crate::presets::Preset;

/// A custom list as it enters the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomListStage {
    pub name: String,
    pub position: PositionInFilterChain,
    pub preset: String,
    /// Ranges in the numbering of the stage's input: source numbers, or
    /// output numbers for `PostDecimate`.
    pub ranges: Vec<FrameRange>,
}

/// Presets filtering one section, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFilter {
    pub range: FrameRange,
    pub presets: Vec<String>,
}

/// Source range that keeps the same offsets of every 5-frame cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectEveryRange {
    pub range: FrameRange,
    pub cycle: usize,
    pub kept_offsets: Vec<u8>,
}

/// How decimated frames are removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", content = "entries", rename_all = "snake_case")]
pub enum Decimation {
    SelectEvery(Vec<SelectEveryRange>),
    DeleteFrames(Vec<usize>),
}

impl Decimation {
    pub fn len(&self) -> usize {
        match self {
            Decimation::SelectEvery(ranges) => ranges.len(),
            Decimation::DeleteFrames(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    Source {
        path: String,
        filter: String,
    },
    Crop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    },
    CustomList(CustomListStage),
    /// Field matching with one match symbol per source frame.
    FieldMatch {
        matches: String,
    },
    SectionPresets {
        sections: Vec<SectionFilter>,
    },
    FreezeFrames {
        frames: Vec<FreezeFrame>,
    },
    Decimate(Decimation),
    Resize {
        width: u32,
        height: u32,
        filter: String,
    },
    Depth {
        bits: u8,
        float_samples: bool,
        dither: String,
    },
}

impl Stage {
    /// Short stage name for logs and listings.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Source { .. } => "source",
            Stage::Crop { .. } => "crop",
            Stage::CustomList(_) => "custom list",
            Stage::FieldMatch { .. } => "field match",
            Stage::SectionPresets { .. } => "section presets",
            Stage::FreezeFrames { .. } => "freeze frames",
            Stage::Decimate(_) => "decimate",
            Stage::Resize { .. } => "resize",
            Stage::Depth { .. } => "depth",
        }
    }
}

/// Ordered stages plus the preset bodies they reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDescription {
    pub stages: Vec<Stage>,
    pub presets: Vec<Preset>,
    /// Preview pipelines stop before decimation.
    pub preview: bool,
}

impl PipelineDescription {
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }
}

/// One line per stage, for logs and the CLI.
pub fn format_stages_pretty(description: &PipelineDescription) -> String {
    let mut lines = Vec::new();
    for (i, stage) in description.stages.iter().enumerate() {
        let detail = match stage {
            Stage::Source { path, filter } => format!("{} via {}", path, filter),
            Stage::Crop {
                left,
                top,
                right,
                bottom,
            } => format!("{} {} {} {}", left, top, right, bottom),
            Stage::CustomList(list) => format!(
                "'{}' through '{}', {} ranges",
                list.name,
                list.preset,
                list.ranges.len()
            ),
            Stage::FieldMatch { matches } => format!("{} frames", matches.len()),
            Stage::SectionPresets { sections } => format!("{} sections", sections.len()),
            Stage::FreezeFrames { frames } => format!("{} ranges", frames.len()),
            Stage::Decimate(Decimation::SelectEvery(ranges)) => {
                format!("SelectEvery, {} ranges", ranges.len())
            }
            Stage::Decimate(Decimation::DeleteFrames(frames)) => {
                format!("DeleteFrames, {} frames", frames.len())
            }
            Stage::Resize {
                width,
                height,
                filter,
            } => format!("{}x{} ({})", width, height, filter),
            Stage::Depth { bits, .. } => format!("{} bits", bits),
        };
        lines.push(format!("{:>2}. {:<16} {}", i + 1, stage.name(), detail));
    }
    lines.join("\n")
}
