//! Viewer state saved with the project but outside undo.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub last_visited_frame: usize,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// Opaque window layout data owned by the GUI.
    #[serde(default)]
    pub ui_blob: String,
}

fn default_zoom() -> u8 {
    MIN_ZOOM
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            last_visited_frame: 0,
            zoom: default_zoom(),
            ui_blob: String::new(),
        }
    }
}
