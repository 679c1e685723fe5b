//! Freeze frames, bookmarks and combed frames.

use crate::changes::{Change, Changeset};
use crate::error::ProjectResult;
use crate::models::{Bookmark, FreezeFrame};

use super::Project;

impl Project {
    /// Show `replacement` in place of every frame of `[first, last]`.
    pub fn add_freeze_frame(
        &mut self,
        first: usize,
        last: usize,
        replacement: usize,
    ) -> ProjectResult<Changeset> {
        let frame_count = self.frame_count();
        self.state.freeze_frames.add(
            FreezeFrame {
                first,
                last,
                replacement,
            },
            frame_count,
        )?;
        Ok(Changeset::of(Change::FreezeFrames))
    }

    pub fn delete_freeze_frame(&mut self, first: usize) -> ProjectResult<Changeset> {
        let removed = self.state.freeze_frames.delete(first)?;
        tracing::debug!("Deleted freeze frame [{},{}]", removed.first, removed.last);
        Ok(Changeset::of(Change::FreezeFrames))
    }

    pub fn find_freeze_frame(&self, frame: usize) -> Option<&FreezeFrame> {
        self.state.freeze_frames.find(frame)
    }

    /// Whether generated pipelines apply freeze frames.
    pub fn set_freeze_frames_wanted(&mut self, wanted: bool) -> Changeset {
        if self.state.output.freeze_frames_wanted == wanted {
            return Changeset::new();
        }
        self.state.output.freeze_frames_wanted = wanted;
        let mut changes = Changeset::of(Change::FreezeFrames);
        changes.push(Change::OutputSettings);
        changes
    }

    // =========================================================================
    // Bookmarks
    // =========================================================================

    pub fn add_bookmark(&mut self, frame: usize, description: &str) -> ProjectResult<Changeset> {
        let frame_count = self.frame_count();
        if !self.state.bookmarks.add(frame, description, frame_count)? {
            return Ok(Changeset::new());
        }
        Ok(Changeset::of(Change::Bookmarks))
    }

    pub fn delete_bookmark(&mut self, frame: usize) -> ProjectResult<Changeset> {
        self.state.bookmarks.delete(frame)?;
        Ok(Changeset::of(Change::Bookmarks))
    }

    pub fn find_next_bookmark(&self, frame: usize) -> Option<&Bookmark> {
        self.state.bookmarks.find_next(frame)
    }

    pub fn find_previous_bookmark(&self, frame: usize) -> Option<&Bookmark> {
        self.state.bookmarks.find_previous(frame)
    }

    // =========================================================================
    // Combed frames
    // =========================================================================

    pub fn add_combed_frame(&mut self, frame: usize) -> ProjectResult<Changeset> {
        let frame_count = self.frame_count();
        if !self.state.combed.add(frame, frame_count)? {
            return Ok(Changeset::new());
        }
        Ok(Changeset::of(Change::CombedFrames))
    }

    pub fn delete_combed_frame(&mut self, frame: usize) -> Changeset {
        if !self.state.combed.delete(frame) {
            return Changeset::new();
        }
        Changeset::of(Change::CombedFrames)
    }

    pub fn clear_combed_frames(&mut self) -> Changeset {
        if !self.state.combed.clear() {
            return Changeset::new();
        }
        Changeset::of(Change::CombedFrames)
    }

    pub fn find_next_combed_frame(&self, frame: usize) -> Option<usize> {
        self.state.combed.find_next(frame)
    }

    pub fn find_previous_combed_frame(&self, frame: usize) -> Option<usize> {
        self.state.combed.find_previous(frame)
    }
}
