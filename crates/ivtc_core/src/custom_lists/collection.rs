//! Ordered custom lists.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};
use crate::models::{validate_identifier, FrameRange, PositionInFilterChain};
use crate::presets::PresetCollection;

use super::ranges::FrameRanges;

/// A named set of ranges filtered through one preset at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomList {
    pub name: String,
    #[serde(default)]
    pub position: PositionInFilterChain,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub ranges: FrameRanges,
}

impl CustomList {
    pub fn new(name: &str, position: PositionInFilterChain) -> Self {
        Self {
            name: name.to_string(),
            position,
            preset: None,
            ranges: FrameRanges::new(),
        }
    }
}

/// Custom lists in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomListCollection {
    lists: Vec<CustomList>,
}

impl CustomListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored lists, checking names.
    pub fn from_lists(lists: Vec<CustomList>) -> ProjectResult<Self> {
        let mut collection = Self::new();
        for list in lists {
            collection.check_new_name(&list.name)?;
            collection.lists.push(list);
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomList> {
        self.lists.iter()
    }

    pub fn index_of(&self, name: &str) -> ProjectResult<usize> {
        self.lists
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| ProjectError::not_found("Custom list", name))
    }

    pub fn get(&self, name: &str) -> ProjectResult<&CustomList> {
        let index = self.index_of(name)?;
        Ok(&self.lists[index])
    }

    fn get_mut(&mut self, name: &str) -> ProjectResult<&mut CustomList> {
        let index = self.index_of(name)?;
        Ok(&mut self.lists[index])
    }

    fn check_new_name(&self, name: &str) -> ProjectResult<()> {
        validate_identifier(name)?;
        if self.lists.iter().any(|l| l.name == name) {
            return Err(ProjectError::invalid_name(
                name,
                "a custom list with this name already exists",
            ));
        }
        Ok(())
    }

    /// Append a new empty list.
    pub fn add(&mut self, name: &str, position: PositionInFilterChain) -> ProjectResult<()> {
        self.check_new_name(name)?;
        self.lists.push(CustomList::new(name, position));
        tracing::debug!("Added custom list '{}' at {}", name, position);
        Ok(())
    }

    /// Rename a list. Returns false when `old == new`.
    pub fn rename(&mut self, old: &str, new: &str) -> ProjectResult<bool> {
        let index = self.index_of(old)?;
        if old == new {
            return Ok(false);
        }
        self.check_new_name(new)?;
        self.lists[index].name = new.to_string();
        Ok(true)
    }

    /// Remove a list and return it.
    pub fn remove(&mut self, name: &str) -> ProjectResult<CustomList> {
        let index = self.index_of(name)?;
        Ok(self.lists.remove(index))
    }

    /// Move a list one place earlier. No-op for the first list.
    pub fn move_up(&mut self, name: &str) -> ProjectResult<bool> {
        let index = self.index_of(name)?;
        if index == 0 {
            return Ok(false);
        }
        self.lists.swap(index, index - 1);
        Ok(true)
    }

    /// Move a list one place later. No-op for the last list.
    pub fn move_down(&mut self, name: &str) -> ProjectResult<bool> {
        let index = self.index_of(name)?;
        if index + 1 == self.lists.len() {
            return Ok(false);
        }
        self.lists.swap(index, index + 1);
        Ok(true)
    }

    pub fn set_position(
        &mut self,
        name: &str,
        position: PositionInFilterChain,
    ) -> ProjectResult<bool> {
        let list = self.get_mut(name)?;
        let changed = list.position != position;
        list.position = position;
        Ok(changed)
    }

    /// Assign or clear the preset. Existence is checked by the caller.
    pub fn set_preset(&mut self, name: &str, preset: Option<&str>) -> ProjectResult<bool> {
        let list = self.get_mut(name)?;
        let preset = preset.map(str::to_string);
        let changed = list.preset != preset;
        list.preset = preset;
        Ok(changed)
    }

    pub fn add_range(&mut self, name: &str, range: FrameRange) -> ProjectResult<()> {
        self.get_mut(name)?.ranges.insert(range)
    }

    /// Delete the range starting at `first`.
    pub fn delete_range(&mut self, name: &str, first: usize) -> ProjectResult<FrameRange> {
        self.get_mut(name)?.ranges.remove(first)
    }

    /// The range of list `name` covering `frame`.
    pub fn find_range(&self, name: &str, frame: usize) -> ProjectResult<Option<FrameRange>> {
        Ok(self.get(name)?.ranges.find(frame).copied())
    }

    /// Copy the range starting at `first` from one list to another.
    pub fn copy_range(&mut self, from: &str, to: &str, first: usize) -> ProjectResult<FrameRange> {
        let range = self
            .get(from)?
            .ranges
            .get(first)
            .copied()
            .ok_or_else(|| ProjectError::not_found("Range starting at frame", first))?;
        self.add_range(to, range)?;
        Ok(range)
    }

    /// Move the range starting at `first` from one list to another.
    ///
    /// Inserts first; on failure neither list changes.
    pub fn move_range(&mut self, from: &str, to: &str, first: usize) -> ProjectResult<FrameRange> {
        if from == to {
            self.get(from)?;
            return Err(ProjectError::invalid_name(
                to,
                "cannot move a range to the list it is in",
            ));
        }
        let range = self.copy_range(from, to, first)?;
        self.delete_range(from, first)?;
        Ok(range)
    }

    /// Whether a list contributes to generated pipelines: it has ranges and
    /// a preset that exists.
    pub fn is_in_use(&self, name: &str, presets: &PresetCollection) -> ProjectResult<bool> {
        let list = self.get(name)?;
        Ok(!list.ranges.is_empty()
            && list
                .preset
                .as_deref()
                .is_some_and(|preset| presets.contains(preset)))
    }

    /// Names of lists assigned `preset`.
    pub fn lists_using_preset(&self, preset: &str) -> Vec<String> {
        self.lists
            .iter()
            .filter(|l| l.preset.as_deref() == Some(preset))
            .map(|l| l.name.clone())
            .collect()
    }

    pub(crate) fn rename_preset(&mut self, old: &str, new: &str) {
        for list in self.lists.iter_mut() {
            if list.preset.as_deref() == Some(old) {
                list.preset = Some(new.to_string());
            }
        }
    }

    pub(crate) fn remove_preset(&mut self, preset: &str) {
        for list in self.lists.iter_mut() {
            if list.preset.as_deref() == Some(preset) {
                list.preset = None;
            }
        }
    }

    /// Insert or replace a list by name, keeping position in the order.
    pub(crate) fn upsert(&mut self, list: CustomList) -> ProjectResult<()> {
        validate_identifier(&list.name)?;
        match self.lists.iter_mut().find(|l| l.name == list.name) {
            Some(existing) => *existing = list,
            None => self.lists.push(list),
        }
        Ok(())
    }
}
