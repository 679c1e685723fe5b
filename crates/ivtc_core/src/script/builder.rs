//! Builds a `PipelineDescription` from project state.
//!
//! Stage order:
//!
//! 1. source, then crop if it is early
//! 2. `PostSource` custom lists
//! 3. field match, then section presets
//! 4. `PostFieldMatch` custom lists
//! 5. freeze frames when wanted
//! 6. decimation
//! 7. `PostDecimate` custom lists, in output numbering
//! 8. late crop, resize, bit depth
//!
//! Preview pipelines stop after step 5.

use std::collections::BTreeSet;

use crate::error::ProjectResult;
use crate::frames::{FrameNumberMapper, CYCLE};
use crate::models::{DecimationFunction, FrameRange, PositionInFilterChain};
use crate::project::Project;

use super::stages::{
    CustomListStage, Decimation, PipelineDescription, SectionFilter, SelectEveryRange, Stage,
};

/// Builder for pipeline descriptions.
pub struct PipelineBuilder<'a> {
    project: &'a Project,
    preview: bool,
    preview_freeze_frames: bool,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            preview: false,
            preview_freeze_frames: false,
        }
    }

    /// Build the preview variant. `freeze_frames` decides whether freeze
    /// frames are shown while editing.
    pub fn preview(mut self, freeze_frames: bool) -> Self {
        self.preview = true;
        self.preview_freeze_frames = freeze_frames;
        self
    }

    pub fn build(&self) -> ProjectResult<PipelineDescription> {
        let project = self.project;
        let output = project.output_settings();
        let mut stages = Vec::new();
        let mut referenced = BTreeSet::new();

        let source = project.source();
        stages.push(Stage::Source {
            path: source.path.clone(),
            filter: source.filter.clone(),
        });
        if output.crop.enabled && output.crop.early {
            stages.push(self.crop_stage());
        }

        self.add_custom_lists(
            &mut stages,
            &mut referenced,
            PositionInFilterChain::PostSource,
            None,
        );

        stages.push(Stage::FieldMatch {
            matches: project
                .decisions()
                .match_string(0, project.frame_count() - 1)?,
        });
        let sections: Vec<SectionFilter> = project
            .sections()
            .ranges()
            .into_iter()
            .zip(project.sections().iter())
            .filter(|(_, section)| !section.presets.is_empty())
            .map(|(range, section)| {
                referenced.extend(section.presets.iter().cloned());
                SectionFilter {
                    range,
                    presets: section.presets.clone(),
                }
            })
            .collect();
        if !sections.is_empty() {
            stages.push(Stage::SectionPresets { sections });
        }

        self.add_custom_lists(
            &mut stages,
            &mut referenced,
            PositionInFilterChain::PostFieldMatch,
            None,
        );

        let freeze_frames = if self.preview {
            self.preview_freeze_frames
        } else {
            output.freeze_frames_wanted
        };
        if freeze_frames && !project.freeze_frames().is_empty() {
            stages.push(Stage::FreezeFrames {
                frames: project.freeze_frames().iter().copied().collect(),
            });
        }

        if !self.preview {
            let mapper = project.mapper();
            if let Some(decimation) = decimation(mapper, output.decimation_function) {
                tracing::debug!(
                    "Decimating with {} entries",
                    decimation.len()
                );
                stages.push(Stage::Decimate(decimation));
            }

            self.add_custom_lists(
                &mut stages,
                &mut referenced,
                PositionInFilterChain::PostDecimate,
                Some(mapper),
            );

            if output.crop.enabled && !output.crop.early {
                stages.push(self.crop_stage());
            }
            if output.resize.enabled {
                stages.push(Stage::Resize {
                    width: output.resize.width,
                    height: output.resize.height,
                    filter: output.resize.filter.clone(),
                });
            }
            if output.depth.enabled {
                stages.push(Stage::Depth {
                    bits: output.depth.bits,
                    float_samples: output.depth.float_samples,
                    dither: output.depth.dither.clone(),
                });
            }
        }

        let presets = project
            .presets()
            .iter()
            .filter(|preset| referenced.contains(&preset.name))
            .cloned()
            .collect();

        let description = PipelineDescription {
            stages,
            presets,
            preview: self.preview,
        };
        tracing::debug!(
            "Built {} pipeline: {}",
            if self.preview { "preview" } else { "final" },
            description.stage_names().join(" -> ")
        );
        Ok(description)
    }

    fn crop_stage(&self) -> Stage {
        let crop = &self.project.output_settings().crop;
        Stage::Crop {
            left: crop.left,
            top: crop.top,
            right: crop.right,
            bottom: crop.bottom,
        }
    }

    /// Add every contributing list at `position`. With a mapper, ranges are
    /// renumbered to output frames and fully decimated ranges are skipped.
    fn add_custom_lists(
        &self,
        stages: &mut Vec<Stage>,
        referenced: &mut BTreeSet<String>,
        position: PositionInFilterChain,
        mapper: Option<&FrameNumberMapper>,
    ) {
        let presets = self.project.presets();
        for list in self.project.custom_lists().iter() {
            if list.position != position {
                continue;
            }
            let Some(preset) = list.preset.as_deref().filter(|p| presets.contains(p)) else {
                continue;
            };
            let ranges: Vec<FrameRange> = match mapper {
                Some(mapper) => list
                    .ranges
                    .iter()
                    .filter_map(|range| to_output_range(mapper, *range))
                    .collect(),
                None => list.ranges.iter().copied().collect(),
            };
            if ranges.is_empty() {
                continue;
            }
            referenced.insert(preset.to_string());
            stages.push(Stage::CustomList(CustomListStage {
                name: list.name.clone(),
                position,
                preset: preset.to_string(),
                ranges,
            }));
        }
    }
}

/// Output frames covered by the kept frames of a source range.
fn to_output_range(mapper: &FrameNumberMapper, range: FrameRange) -> Option<FrameRange> {
    let kept = mapper.kept_in(range);
    if kept == 0 {
        return None;
    }
    let first = mapper.to_output(range.first).ok()?;
    Some(FrameRange::new(first, first + kept - 1))
}

/// The decimation stage, or `None` when nothing is decimated.
fn decimation(mapper: &FrameNumberMapper, function: DecimationFunction) -> Option<Decimation> {
    let frame_count = mapper.source_frame_count();
    let dropped = frame_count - mapper.output_frame_count();
    if dropped == 0 {
        return None;
    }

    let pattern_ranges = mapper.decimation_pattern_ranges();
    let use_select_every = match function {
        DecimationFunction::SelectEvery => true,
        DecimationFunction::DeleteFrames => false,
        DecimationFunction::Auto => pattern_ranges.len() < dropped,
    };

    if !use_select_every {
        let frames = (0..frame_count)
            .filter(|&frame| mapper.output_position(frame).is_err())
            .collect();
        return Some(Decimation::DeleteFrames(frames));
    }

    let ranges = pattern_ranges
        .iter()
        .enumerate()
        .map(|(i, pattern)| {
            let last = pattern_ranges
                .get(i + 1)
                .map(|next| next.start - 1)
                .unwrap_or(frame_count - 1);
            SelectEveryRange {
                range: FrameRange::new(pattern.start, last),
                cycle: CYCLE,
                kept_offsets: (0..CYCLE as u8)
                    .filter(|offset| !pattern.dropped_offsets.contains(offset))
                    .collect(),
            }
        })
        .collect();
    Some(Decimation::SelectEvery(ranges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, Resize, SourceInfo};

    fn project(frame_count: usize) -> Project {
        Project::new(SourceInfo {
            path: "episode.mkv".to_string(),
            filter: "lsmas.LWLibavSource".to_string(),
            frame_count,
            width: 720,
            height: 480,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn minimal_pipeline() {
        let project = project(10);
        let description = PipelineBuilder::new(&project).build().unwrap();
        assert_eq!(description.stage_names(), vec!["source", "field match"]);
        assert!(description.presets.is_empty());
    }

    #[test]
    fn stage_order() {
        let mut project = project(20);
        project.add_preset_with_body("deblock", "clip = deblock(clip)").unwrap();
        project.add_preset("unused").unwrap();
        project.set_section_preset(0, "deblock").unwrap();
        project
            .add_custom_list("late", PositionInFilterChain::PostDecimate)
            .unwrap();
        project.set_custom_list_preset("late", Some("deblock")).unwrap();
        project.add_custom_list_range("late", 5, 9).unwrap();
        project
            .add_custom_list("early", PositionInFilterChain::PostSource)
            .unwrap();
        project.set_custom_list_preset("early", Some("deblock")).unwrap();
        project.add_custom_list_range("early", 0, 2).unwrap();
        project.add_freeze_frame(1, 2, 0).unwrap();
        project
            .set_range_decimation_from_pattern(0, 19, "kkkkd")
            .unwrap();
        project.set_crop(Crop {
            enabled: true,
            early: true,
            left: 8,
            ..Default::default()
        });
        project
            .set_resize(Resize {
                enabled: true,
                width: 640,
                height: 480,
                ..Default::default()
            })
            .unwrap();

        let description = PipelineBuilder::new(&project).build().unwrap();
        assert_eq!(
            description.stage_names(),
            vec![
                "source",
                "crop",
                "custom list",
                "field match",
                "section presets",
                "freeze frames",
                "decimate",
                "custom list",
                "resize",
            ]
        );
        assert_eq!(description.presets.len(), 1);
        assert_eq!(description.presets[0].name, "deblock");

        // Source frames 5..=9 keep 5..=8, which are output frames 4..=7.
        let late = description
            .stages
            .iter()
            .find_map(|stage| match stage {
                Stage::CustomList(list) if list.name == "late" => Some(list),
                _ => None,
            })
            .unwrap();
        assert_eq!(late.ranges, vec![FrameRange::new(4, 7)]);
    }

    #[test]
    fn preview_stops_before_decimation() {
        let mut project = project(20);
        project.add_freeze_frame(1, 2, 0).unwrap();
        project
            .set_range_decimation_from_pattern(0, 19, "kkkkd")
            .unwrap();

        let preview = PipelineBuilder::new(&project).preview(false).build().unwrap();
        assert!(preview.preview);
        assert_eq!(preview.stage_names(), vec!["source", "field match"]);

        let preview = PipelineBuilder::new(&project).preview(true).build().unwrap();
        assert_eq!(
            preview.stage_names(),
            vec!["source", "field match", "freeze frames"]
        );
    }

    #[test]
    fn auto_picks_fewer_entries() {
        let mut project = project(100);
        project
            .set_range_decimation_from_pattern(0, 99, "kkkkd")
            .unwrap();
        let description = PipelineBuilder::new(&project).build().unwrap();
        match description.stages.last() {
            Some(Stage::Decimate(Decimation::SelectEvery(ranges))) => {
                assert_eq!(ranges.len(), 1);
                assert_eq!(ranges[0].kept_offsets, vec![0, 1, 2, 3]);
            }
            other => panic!("unexpected stage {:?}", other),
        }

        let mut project = self::project(100);
        project.set_decimated(42, true).unwrap();
        let description = PipelineBuilder::new(&project).build().unwrap();
        assert_eq!(
            description.stages.last(),
            Some(&Stage::Decimate(Decimation::DeleteFrames(vec![42])))
        );
    }
}
