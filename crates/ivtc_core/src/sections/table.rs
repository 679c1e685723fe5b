//! Section table keyed by start frame.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use serde::{Deserialize, Serialize};

use crate::error::{check_frame, ProjectError, ProjectResult};
use crate::models::FrameRange;

/// A section and its ordered preset names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    #[serde(default)]
    pub presets: Vec<String>,
}

impl Section {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            presets: Vec::new(),
        }
    }
}

/// Ordered partition of `[0, frame_count)` into sections.
///
/// A section always starts at frame 0 and can't be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    sections: BTreeMap<usize, Section>,
    frame_count: usize,
}

impl SectionTable {
    /// A single section covering everything.
    pub fn new(frame_count: usize) -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(0, Section::new(0));
        Self {
            sections,
            frame_count,
        }
    }

    /// Rebuild from stored sections, checking the partition invariants.
    pub fn from_sections(
        frame_count: usize,
        sections: impl IntoIterator<Item = Section>,
    ) -> ProjectResult<Self> {
        let mut map = BTreeMap::new();
        for section in sections {
            check_frame(section.start, frame_count)?;
            let start = section.start;
            if map.insert(start, section).is_some() {
                return Err(ProjectError::invalid_project(format!(
                    "two sections start at frame {}",
                    start
                )));
            }
        }
        if !map.contains_key(&0) {
            map.insert(0, Section::new(0));
        }
        Ok(Self {
            sections: map,
            frame_count,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in start order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn starts(&self) -> Vec<usize> {
        self.sections.keys().copied().collect()
    }

    /// Section starting exactly at `start`.
    pub fn get(&self, start: usize) -> ProjectResult<&Section> {
        self.sections
            .get(&start)
            .ok_or_else(|| ProjectError::not_found("Section", start))
    }

    fn get_mut(&mut self, start: usize) -> ProjectResult<&mut Section> {
        self.sections
            .get_mut(&start)
            .ok_or_else(|| ProjectError::not_found("Section", start))
    }

    /// The section containing `frame`.
    pub fn find_section(&self, frame: usize) -> ProjectResult<&Section> {
        check_frame(frame, self.frame_count)?;
        self.sections
            .range(..=frame)
            .next_back()
            .map(|(_, section)| section)
            .ok_or_else(|| ProjectError::not_found("Section containing frame", frame))
    }

    /// The first section starting after `frame`.
    pub fn find_next_section(&self, frame: usize) -> Option<&Section> {
        self.sections
            .range((Excluded(frame), Unbounded))
            .next()
            .map(|(_, section)| section)
    }

    /// The section before the one containing `frame`.
    pub fn find_previous_section(&self, frame: usize) -> Option<&Section> {
        let current = self.find_section(frame).ok()?.start;
        self.sections
            .range(..current)
            .next_back()
            .map(|(_, section)| section)
    }

    /// Last frame (inclusive) of the section starting at `start`.
    pub fn section_end(&self, start: usize) -> ProjectResult<usize> {
        self.get(start)?;
        Ok(self
            .find_next_section(start)
            .map(|next| next.start - 1)
            .unwrap_or(self.frame_count - 1))
    }

    /// Frames covered by the section starting at `start`.
    pub fn section_range(&self, start: usize) -> ProjectResult<FrameRange> {
        Ok(FrameRange::new(start, self.section_end(start)?))
    }

    /// Frames covered by the section containing `frame`.
    pub fn range_containing(&self, frame: usize) -> ProjectResult<FrameRange> {
        let start = self.find_section(frame)?.start;
        self.section_range(start)
    }

    /// All section ranges in order.
    pub fn ranges(&self) -> Vec<FrameRange> {
        let starts = self.starts();
        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts
                    .get(i + 1)
                    .map(|next| next - 1)
                    .unwrap_or(self.frame_count - 1);
                FrameRange::new(start, end)
            })
            .collect()
    }

    /// Start a new section at `frame`, splitting the containing one.
    ///
    /// Returns the range of the new section.
    pub fn add_section(&mut self, frame: usize) -> ProjectResult<FrameRange> {
        check_frame(frame, self.frame_count)?;
        if self.sections.contains_key(&frame) {
            return Err(ProjectError::already_exists("Section", frame));
        }
        self.sections.insert(frame, Section::new(frame));
        tracing::debug!("Added section at frame {}", frame);
        self.section_range(frame)
    }

    /// Remove the section starting at `frame`, merging it into the previous.
    ///
    /// Returns the removed section and the range of the merged section.
    pub fn delete_section(&mut self, frame: usize) -> ProjectResult<(Section, FrameRange)> {
        if frame == 0 {
            return Err(ProjectError::ProtectedSection);
        }
        let removed = self
            .sections
            .remove(&frame)
            .ok_or_else(|| ProjectError::not_found("Section", frame))?;
        tracing::debug!("Deleted section at frame {}", frame);
        let merged = self.range_containing(frame)?;
        Ok((removed, merged))
    }

    /// Append a preset to a section's list.
    ///
    /// Returns false if the preset was already in the list.
    pub fn set_section_preset(&mut self, start: usize, preset: &str) -> ProjectResult<bool> {
        let section = self.get_mut(start)?;
        if section.presets.iter().any(|p| p == preset) {
            return Ok(false);
        }
        section.presets.push(preset.to_string());
        Ok(true)
    }

    /// Swap the preset at `index` with the one before it.
    pub fn move_section_preset_up(&mut self, start: usize, index: usize) -> ProjectResult<bool> {
        let section = self.get_mut(start)?;
        check_preset_index(section, index)?;
        if index == 0 {
            return Ok(false);
        }
        section.presets.swap(index, index - 1);
        Ok(true)
    }

    /// Swap the preset at `index` with the one after it.
    pub fn move_section_preset_down(&mut self, start: usize, index: usize) -> ProjectResult<bool> {
        let section = self.get_mut(start)?;
        check_preset_index(section, index)?;
        if index + 1 == section.presets.len() {
            return Ok(false);
        }
        section.presets.swap(index, index + 1);
        Ok(true)
    }

    /// Remove the preset at `index`, returning its name.
    pub fn delete_section_preset(&mut self, start: usize, index: usize) -> ProjectResult<String> {
        let section = self.get_mut(start)?;
        check_preset_index(section, index)?;
        Ok(section.presets.remove(index))
    }

    /// Starts of sections whose preset list names `preset`.
    pub fn sections_using_preset(&self, preset: &str) -> Vec<usize> {
        self.sections
            .values()
            .filter(|s| s.presets.iter().any(|p| p == preset))
            .map(|s| s.start)
            .collect()
    }

    pub(crate) fn rename_preset(&mut self, old: &str, new: &str) {
        for section in self.sections.values_mut() {
            for preset in section.presets.iter_mut() {
                if preset == old {
                    *preset = new.to_string();
                }
            }
        }
    }

    pub(crate) fn remove_preset(&mut self, name: &str) {
        for section in self.sections.values_mut() {
            section.presets.retain(|p| p != name);
        }
    }
}

fn check_preset_index(section: &Section, index: usize) -> ProjectResult<()> {
    if index >= section.presets.len() {
        return Err(ProjectError::out_of_range(
            "Preset index",
            index,
            section.presets.len(),
        ));
    }
    Ok(())
}
