//! Presets and custom lists.
//!
//! Preset references live in sections and custom lists; renames and
//! deletions are propagated to both here.

use crate::changes::{Change, Changeset};
use crate::error::{check_range, InUseWarning, ProjectError, ProjectResult};
use crate::models::{FrameRange, PositionInFilterChain};

use super::Project;

fn changed_if(changed: bool, change: Change) -> Changeset {
    if changed {
        Changeset::of(change)
    } else {
        Changeset::new()
    }
}

impl Project {
    // =========================================================================
    // Presets
    // =========================================================================

    pub fn add_preset(&mut self, name: &str) -> ProjectResult<Changeset> {
        self.state.presets.add(name)?;
        Ok(Changeset::of(Change::Presets))
    }

    pub fn add_preset_with_body(&mut self, name: &str, body: &str) -> ProjectResult<Changeset> {
        self.state.presets.add_with_body(name, body)?;
        Ok(Changeset::of(Change::Presets))
    }

    /// Rename a preset and every reference to it.
    pub fn rename_preset(&mut self, old: &str, new: &str) -> ProjectResult<Changeset> {
        if !self.state.presets.rename(old, new)? {
            return Ok(Changeset::new());
        }
        let mut changes = Changeset::of(Change::Presets);
        if !self.state.sections.sections_using_preset(old).is_empty() {
            self.state.sections.rename_preset(old, new);
            changes.push(Change::Sections(self.all_frames()));
        }
        if !self.state.custom_lists.lists_using_preset(old).is_empty() {
            self.state.custom_lists.rename_preset(old, new);
            changes.push(Change::CustomLists);
        }
        Ok(changes)
    }

    pub fn set_preset_body(&mut self, name: &str, body: &str) -> ProjectResult<Changeset> {
        let changed = self.state.presets.set_body(name, body)?;
        Ok(changed_if(changed, Change::Presets))
    }

    /// Names of the places that reference `name`.
    fn preset_users(&self, name: &str) -> Vec<String> {
        let sections = self
            .state
            .sections
            .sections_using_preset(name)
            .into_iter()
            .map(|start| format!("section {}", start));
        let lists = self
            .state
            .custom_lists
            .lists_using_preset(name)
            .into_iter()
            .map(|list| format!("custom list '{}'", list));
        sections.chain(lists).collect()
    }

    pub fn is_preset_in_use(&self, name: &str) -> ProjectResult<bool> {
        self.state.presets.get(name)?;
        Ok(!self.preset_users(name).is_empty())
    }

    /// Delete a preset and drop every reference to it.
    ///
    /// Deleting a referenced preset succeeds and returns a warning naming
    /// the former users.
    pub fn delete_preset(
        &mut self,
        name: &str,
    ) -> ProjectResult<(Changeset, Option<InUseWarning>)> {
        self.state.presets.get(name)?;
        let used_by = self.preset_users(name);
        self.state.presets.remove(name)?;

        let mut changes = Changeset::of(Change::Presets);
        let warning = if used_by.is_empty() {
            None
        } else {
            self.state.sections.remove_preset(name);
            self.state.custom_lists.remove_preset(name);
            changes.push(Change::Sections(self.all_frames()));
            changes.push(Change::CustomLists);
            let warning = InUseWarning {
                what: "Preset".to_string(),
                name: name.to_string(),
                used_by,
            };
            tracing::warn!("{}", warning);
            Some(warning)
        };
        tracing::debug!("Deleted preset '{}'", name);
        Ok((changes, warning))
    }

    fn all_frames(&self) -> FrameRange {
        FrameRange::new(0, self.frame_count() - 1)
    }

    // =========================================================================
    // Custom lists
    // =========================================================================

    pub fn add_custom_list(
        &mut self,
        name: &str,
        position: PositionInFilterChain,
    ) -> ProjectResult<Changeset> {
        self.state.custom_lists.add(name, position)?;
        tracing::debug!("Added custom list '{}' at {}", name, position);
        Ok(Changeset::of(Change::CustomLists))
    }

    pub fn rename_custom_list(&mut self, old: &str, new: &str) -> ProjectResult<Changeset> {
        let changed = self.state.custom_lists.rename(old, new)?;
        Ok(changed_if(changed, Change::CustomLists))
    }

    pub fn is_custom_list_in_use(&self, name: &str) -> ProjectResult<bool> {
        self.state
            .custom_lists
            .is_in_use(name, &self.state.presets)
    }

    /// Delete a custom list. Warns if it was contributing to pipelines.
    pub fn delete_custom_list(
        &mut self,
        name: &str,
    ) -> ProjectResult<(Changeset, Option<InUseWarning>)> {
        let in_use = self.is_custom_list_in_use(name)?;
        let removed = self.state.custom_lists.remove(name)?;
        let warning = in_use.then(|| {
            let warning = InUseWarning {
                what: "Custom list".to_string(),
                name: name.to_string(),
                used_by: vec![format!(
                    "{} ranges filtered through preset '{}'",
                    removed.ranges.len(),
                    removed.preset.as_deref().unwrap_or_default()
                )],
            };
            tracing::warn!("{}", warning);
            warning
        });
        tracing::debug!("Deleted custom list '{}'", name);
        Ok((Changeset::of(Change::CustomLists), warning))
    }

    pub fn move_custom_list_up(&mut self, name: &str) -> ProjectResult<Changeset> {
        let changed = self.state.custom_lists.move_up(name)?;
        Ok(changed_if(changed, Change::CustomLists))
    }

    pub fn move_custom_list_down(&mut self, name: &str) -> ProjectResult<Changeset> {
        let changed = self.state.custom_lists.move_down(name)?;
        Ok(changed_if(changed, Change::CustomLists))
    }

    pub fn set_custom_list_position(
        &mut self,
        name: &str,
        position: PositionInFilterChain,
    ) -> ProjectResult<Changeset> {
        let changed = self.state.custom_lists.set_position(name, position)?;
        Ok(changed_if(changed, Change::CustomLists))
    }

    /// Assign an existing preset to a list, or clear it with `None`.
    pub fn set_custom_list_preset(
        &mut self,
        name: &str,
        preset: Option<&str>,
    ) -> ProjectResult<Changeset> {
        if let Some(preset) = preset {
            if !self.state.presets.contains(preset) {
                return Err(ProjectError::not_found("Preset", preset));
            }
        }
        let changed = self.state.custom_lists.set_preset(name, preset)?;
        Ok(changed_if(changed, Change::CustomLists))
    }

    pub fn add_custom_list_range(
        &mut self,
        name: &str,
        first: usize,
        last: usize,
    ) -> ProjectResult<Changeset> {
        check_range(first, last, self.frame_count())?;
        self.state
            .custom_lists
            .add_range(name, FrameRange::new(first, last))?;
        Ok(Changeset::of(Change::CustomLists))
    }

    pub fn delete_custom_list_range(
        &mut self,
        name: &str,
        first: usize,
    ) -> ProjectResult<Changeset> {
        self.state.custom_lists.delete_range(name, first)?;
        Ok(Changeset::of(Change::CustomLists))
    }

    pub fn find_custom_list_range(
        &self,
        name: &str,
        frame: usize,
    ) -> ProjectResult<Option<FrameRange>> {
        self.state.custom_lists.find_range(name, frame)
    }

    pub fn copy_custom_list_range(
        &mut self,
        from: &str,
        to: &str,
        first: usize,
    ) -> ProjectResult<Changeset> {
        self.state.custom_lists.copy_range(from, to, first)?;
        Ok(Changeset::of(Change::CustomLists))
    }

    pub fn move_custom_list_range(
        &mut self,
        from: &str,
        to: &str,
        first: usize,
    ) -> ProjectResult<Changeset> {
        self.state.custom_lists.move_range(from, to, first)?;
        Ok(Changeset::of(Change::CustomLists))
    }
}
