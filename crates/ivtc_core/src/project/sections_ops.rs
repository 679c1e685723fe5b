//! Section partition and per-section preset lists.

use crate::changes::{Change, Changeset};
use crate::error::{ProjectError, ProjectResult};
use crate::models::FrameRange;

use super::Project;

impl Project {
    fn section_changes(&mut self, range: FrameRange) -> Changeset {
        self.sections_changed(range);
        let mut changes = Changeset::of(Change::Sections(range));
        changes.push(Change::OrphanFields);
        changes
    }

    /// Start a new section at `frame`.
    pub fn add_section(&mut self, frame: usize) -> ProjectResult<Changeset> {
        self.state.sections.add_section(frame)?;
        // The previous section shrank as well.
        let range = self.state.sections.range_containing(frame.saturating_sub(1))?;
        let new = self.state.sections.section_range(frame)?;
        Ok(self.section_changes(range.union(&new)))
    }

    /// Delete the section starting at `frame`, merging it into the previous.
    pub fn delete_section(&mut self, frame: usize) -> ProjectResult<Changeset> {
        let (_, merged) = self.state.sections.delete_section(frame)?;
        let mut changes = self.section_changes(merged);
        if self.state.guessing.clear_failure(frame) {
            changes.push(Change::PatternGuessing);
        }
        Ok(changes)
    }

    /// Append an existing preset to a section's list.
    pub fn set_section_preset(
        &mut self,
        section_start: usize,
        preset: &str,
    ) -> ProjectResult<Changeset> {
        if !self.state.presets.contains(preset) {
            return Err(ProjectError::not_found("Preset", preset));
        }
        if !self.state.sections.set_section_preset(section_start, preset)? {
            return Ok(Changeset::new());
        }
        let range = self.state.sections.section_range(section_start)?;
        Ok(Changeset::of(Change::Sections(range)))
    }

    pub fn move_section_preset_up(
        &mut self,
        section_start: usize,
        index: usize,
    ) -> ProjectResult<Changeset> {
        if !self
            .state
            .sections
            .move_section_preset_up(section_start, index)?
        {
            return Ok(Changeset::new());
        }
        let range = self.state.sections.section_range(section_start)?;
        Ok(Changeset::of(Change::Sections(range)))
    }

    pub fn move_section_preset_down(
        &mut self,
        section_start: usize,
        index: usize,
    ) -> ProjectResult<Changeset> {
        if !self
            .state
            .sections
            .move_section_preset_down(section_start, index)?
        {
            return Ok(Changeset::new());
        }
        let range = self.state.sections.section_range(section_start)?;
        Ok(Changeset::of(Change::Sections(range)))
    }

    pub fn delete_section_preset(
        &mut self,
        section_start: usize,
        index: usize,
    ) -> ProjectResult<Changeset> {
        let name = self
            .state
            .sections
            .delete_section_preset(section_start, index)?;
        tracing::debug!(
            "Removed preset '{}' from section at {}",
            name,
            section_start
        );
        let range = self.state.sections.section_range(section_start)?;
        Ok(Changeset::of(Change::Sections(range)))
    }

    /// Number of frames of the section that survive decimation.
    pub fn section_length_after_decimation(&self, section_start: usize) -> ProjectResult<usize> {
        let range = self.state.sections.section_range(section_start)?;
        Ok(self.mapper().kept_in(range))
    }
}
