//! Output settings and viewer state.

use crate::changes::{Change, Changeset};
use crate::error::{check_frame, ProjectError, ProjectResult};
use crate::models::{Crop, DecimationFunction, Depth, Resize};

use super::{Project, MAX_ZOOM, MIN_ZOOM};

impl Project {
    fn output_changed(changed: bool) -> Changeset {
        if changed {
            Changeset::of(Change::OutputSettings)
        } else {
            Changeset::new()
        }
    }

    pub fn set_crop(&mut self, crop: Crop) -> Changeset {
        let changed = self.state.output.crop != crop;
        self.state.output.crop = crop;
        Self::output_changed(changed)
    }

    /// Set the final resize. An enabled resize needs a non-zero size.
    pub fn set_resize(&mut self, resize: Resize) -> ProjectResult<Changeset> {
        if resize.enabled && (resize.width == 0 || resize.height == 0) {
            return Err(ProjectError::invalid_project(format!(
                "resize to {}x{} is not possible",
                resize.width, resize.height
            )));
        }
        let changed = self.state.output.resize != resize;
        self.state.output.resize = resize;
        Ok(Self::output_changed(changed))
    }

    /// Set the final bit depth. Supported depths are 8 to 16 and 32 (float).
    pub fn set_depth(&mut self, depth: Depth) -> ProjectResult<Changeset> {
        let valid = matches!(depth.bits, 8..=16) || (depth.bits == 32 && depth.float_samples);
        if depth.enabled && !valid {
            return Err(ProjectError::invalid_project(format!(
                "unsupported bit depth {}",
                depth.bits
            )));
        }
        let changed = self.state.output.depth != depth;
        self.state.output.depth = depth;
        Ok(Self::output_changed(changed))
    }

    pub fn set_decimation_function(&mut self, function: DecimationFunction) -> Changeset {
        let changed = self.state.output.decimation_function != function;
        self.state.output.decimation_function = function;
        Self::output_changed(changed)
    }

    // =========================================================================
    // Viewer state (not undoable)
    // =========================================================================

    pub fn set_last_visited_frame(&mut self, frame: usize) -> ProjectResult<()> {
        check_frame(frame, self.frame_count())?;
        if self.ui.last_visited_frame != frame {
            self.ui.last_visited_frame = frame;
            self.modified = true;
        }
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: u8) -> ProjectResult<()> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(ProjectError::out_of_range(
                "Zoom",
                zoom as usize,
                MAX_ZOOM as usize + 1,
            ));
        }
        if self.ui.zoom != zoom {
            self.ui.zoom = zoom;
            self.modified = true;
        }
        Ok(())
    }

    pub fn set_ui_blob(&mut self, blob: &str) {
        if self.ui.ui_blob != blob {
            self.ui.ui_blob = blob.to_string();
            self.modified = true;
        }
    }
}
