//! Output-side settings that shape the generated pipeline.

use serde::{Deserialize, Serialize};

use super::enums::DecimationFunction;

/// Crop applied either right after the source or at the end of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crop {
    #[serde(default)]
    pub enabled: bool,
    /// Crop before field matching instead of after decimation.
    #[serde(default)]
    pub early: bool,
    #[serde(default)]
    pub left: u32,
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
}

/// Final resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resize {
    #[serde(default)]
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_resize_filter")]
    pub filter: String,
}

fn default_resize_filter() -> String {
    "spline16".to_string()
}

impl Default for Resize {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 0,
            height: 0,
            filter: default_resize_filter(),
        }
    }
}

/// Final bit depth conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depth {
    #[serde(default)]
    pub enabled: bool,
    pub bits: u8,
    #[serde(default)]
    pub float_samples: bool,
    #[serde(default = "default_dither")]
    pub dither: String,
}

fn default_dither() -> String {
    "random".to_string()
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            enabled: false,
            bits: 8,
            float_samples: false,
            dither: default_dither(),
        }
    }
}

/// All output settings; part of the undoable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub crop: Crop,
    #[serde(default)]
    pub resize: Resize,
    #[serde(default)]
    pub depth: Depth,
    #[serde(default)]
    pub decimation_function: DecimationFunction,
    /// Whether freeze frames are applied in generated pipelines.
    #[serde(default = "default_true")]
    pub freeze_frames_wanted: bool,
}

fn default_true() -> bool {
    true
}
