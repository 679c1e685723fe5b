//! Importing settings from another project.

use serde::{Deserialize, Serialize};

use crate::changes::{Change, Changeset};
use crate::custom_lists::{CustomList, FrameRanges};
use crate::error::ProjectResult;

use super::Project;

/// What to take from the other project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSelection {
    #[serde(default)]
    pub presets: bool,
    #[serde(default)]
    pub custom_lists: bool,
    #[serde(default)]
    pub crop: bool,
    #[serde(default)]
    pub resize: bool,
    #[serde(default)]
    pub depth: bool,
    #[serde(default)]
    pub zoom: bool,
}

impl ImportSelection {
    pub fn all() -> Self {
        Self {
            presets: true,
            custom_lists: true,
            crop: true,
            resize: true,
            depth: true,
            zoom: true,
        }
    }
}

impl Project {
    /// Copy the selected things from `other`.
    ///
    /// Presets and custom lists with the same name are overwritten. Custom
    /// list ranges beyond this clip are dropped, as are references to
    /// presets this project does not end up with.
    pub fn import_from(
        &mut self,
        other: &Project,
        selection: ImportSelection,
    ) -> ProjectResult<Changeset> {
        let mut state = self.state.clone();
        let mut changes = Changeset::new();

        if selection.presets {
            for preset in other.presets().iter() {
                state.presets.upsert(preset.clone())?;
            }
            changes.push(Change::Presets);
        }

        if selection.custom_lists {
            let frame_count = self.frame_count();
            for list in other.custom_lists().iter() {
                let mut ranges = FrameRanges::new();
                for range in list.ranges.iter().filter(|r| r.last < frame_count) {
                    ranges.insert(*range)?;
                }
                let dropped = list.ranges.len() - ranges.len();
                if dropped > 0 {
                    tracing::warn!(
                        "Dropped {} ranges of custom list '{}' beyond frame {}",
                        dropped,
                        list.name,
                        frame_count - 1
                    );
                }
                let preset = list
                    .preset
                    .clone()
                    .filter(|preset| state.presets.contains(preset));
                state.custom_lists.upsert(CustomList {
                    name: list.name.clone(),
                    position: list.position,
                    preset,
                    ranges,
                })?;
            }
            changes.push(Change::CustomLists);
        }

        let output = other.output_settings();
        if selection.crop {
            state.output.crop = output.crop;
        }
        if selection.resize {
            state.output.resize = output.resize.clone();
        }
        if selection.depth {
            state.output.depth = output.depth.clone();
        }
        if selection.crop || selection.resize || selection.depth {
            changes.push(Change::OutputSettings);
        }

        self.state = state;
        if selection.zoom && self.ui.zoom != other.ui().zoom {
            self.ui.zoom = other.ui().zoom;
            self.modified = true;
        }
        tracing::info!("Imported {:?} from '{}'", selection, other.source().path);
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::project;
    use super::*;
    use crate::models::{Crop, PositionInFilterChain};

    #[test]
    fn import_copies_selected_parts() {
        let mut other = project(100);
        other.add_preset_with_body("deblock", "clip = clip").unwrap();
        other
            .add_custom_list("ops", PositionInFilterChain::PostFieldMatch)
            .unwrap();
        other.set_custom_list_preset("ops", Some("deblock")).unwrap();
        other.add_custom_list_range("ops", 5, 9).unwrap();
        other.add_custom_list_range("ops", 40, 60).unwrap();
        other.set_crop(Crop {
            enabled: true,
            left: 8,
            ..Default::default()
        });
        other.set_zoom(3).unwrap();

        let mut project = project(50);
        project
            .import_from(
                &other,
                ImportSelection {
                    custom_lists: true,
                    crop: true,
                    zoom: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let list = project.custom_lists().get("ops").unwrap();
        assert_eq!(list.ranges.len(), 1);
        // The preset was not imported.
        assert_eq!(list.preset, None);
        assert_eq!(project.output_settings().crop.left, 8);
        assert_eq!(project.ui().zoom, 3);
        assert!(project.presets().is_empty());
    }

    #[test]
    fn import_overwrites_presets_by_name() {
        let mut other = project(10);
        other.add_preset_with_body("deblock", "new").unwrap();
        let mut project = project(10);
        project.add_preset_with_body("deblock", "old").unwrap();
        project.add_preset("keep").unwrap();

        project
            .import_from(
                &other,
                ImportSelection {
                    presets: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(project.presets().get("deblock").unwrap().body, "new");
        assert!(project.presets().contains("keep"));
    }
}
