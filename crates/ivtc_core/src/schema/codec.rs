//! JSON codec.
//!
//! Decoding rebuilds every component through its validating constructor, so
//! a file that loads satisfies the same invariants as a project built by
//! mutators.

use crate::annotations::{BookmarkSet, CombedFrameSet, FreezeFrameSet};
use crate::custom_lists::CustomListCollection;
use crate::error::{check_frame, ProjectError, ProjectResult};
use crate::frames::FrameDecisionTable;
use crate::models::{validate_identifier, Match};
use crate::presets::PresetCollection;
use crate::project::{Project, ProjectState, UiState, MAX_ZOOM, MIN_ZOOM};
use crate::sections::SectionTable;

use super::file::{ProjectFile, CURRENT_VERSION};

/// Encode a project as pretty-printed JSON.
pub fn to_json(project: &Project) -> ProjectResult<String> {
    Ok(serde_json::to_string_pretty(&ProjectFile::from_project(project))?)
}

/// Encode a project as single-line JSON.
pub fn to_json_compact(project: &Project) -> ProjectResult<String> {
    Ok(serde_json::to_string(&ProjectFile::from_project(project))?)
}

/// Decode and validate a project.
pub fn from_json(json: &str, max_undo_steps: usize) -> ProjectResult<Project> {
    let file: ProjectFile = serde_json::from_str(json)?;
    let project = from_file(file, max_undo_steps)?;
    tracing::info!(
        "Loaded project for '{}' ({} frames, {} sections)",
        project.source().path,
        project.frame_count(),
        project.sections().len()
    );
    Ok(project)
}

/// Prefix an error with the part of the file it came from.
fn context(part: &str) -> impl Fn(ProjectError) -> ProjectError + '_ {
    move |err| match err {
        ProjectError::InvalidProject(message) => {
            ProjectError::invalid_project(format!("{}: {}", part, message))
        }
        other => ProjectError::invalid_project(format!("{}: {}", part, other)),
    }
}

fn from_file(file: ProjectFile, max_undo_steps: usize) -> ProjectResult<Project> {
    if file.version == 0 || file.version > CURRENT_VERSION {
        return Err(ProjectError::invalid_project(format!(
            "unsupported project version {} (supported: 1..={})",
            file.version, CURRENT_VERSION
        )));
    }

    let frame_count = file.source.frame_count;
    if frame_count == 0 {
        return Err(ProjectError::invalid_project("source has no frames"));
    }

    let matches = file
        .matches
        .chars()
        .map(|c| {
            Match::from_char(c).ok_or_else(|| {
                ProjectError::invalid_project(format!("invalid match symbol '{}'", c))
            })
        })
        .collect::<ProjectResult<Vec<Match>>>()?;
    if matches.len() != frame_count {
        return Err(ProjectError::invalid_project(format!(
            "{} matches for {} frames",
            matches.len(),
            frame_count
        )));
    }
    let decisions = FrameDecisionTable::from_parts(matches, file.decimated_frames)
        .map_err(context("decimation"))?;

    let mut presets = PresetCollection::new();
    for preset in &file.presets {
        presets
            .add_with_body(&preset.name, &preset.body)
            .map_err(context("presets"))?;
    }

    let sections =
        SectionTable::from_sections(frame_count, file.sections).map_err(context("sections"))?;
    for section in sections.iter() {
        if let Some(missing) = section.presets.iter().find(|p| !presets.contains(p)) {
            return Err(ProjectError::invalid_project(format!(
                "section {} uses unknown preset '{}'",
                section.start, missing
            )));
        }
    }

    for list in &file.custom_lists {
        validate_identifier(&list.name).map_err(context("custom lists"))?;
        if let Some(preset) = list.preset.as_deref().filter(|p| !presets.contains(p)) {
            return Err(ProjectError::invalid_project(format!(
                "custom list '{}' uses unknown preset '{}'",
                list.name, preset
            )));
        }
        if let Some(range) = list.ranges.iter().find(|r| r.last >= frame_count) {
            return Err(ProjectError::invalid_project(format!(
                "custom list '{}' has range {} past the last frame",
                list.name, range
            )));
        }
    }
    let custom_lists =
        CustomListCollection::from_lists(file.custom_lists).map_err(context("custom lists"))?;

    let mut freeze_frames = FreezeFrameSet::new();
    for freeze in file.freeze_frames {
        freeze_frames
            .add(freeze, frame_count)
            .map_err(context("freeze frames"))?;
    }

    let mut bookmarks = BookmarkSet::new();
    for bookmark in &file.bookmarks {
        bookmarks
            .add(bookmark.frame, &bookmark.description, frame_count)
            .map_err(context("bookmarks"))?;
    }

    let mut combed = CombedFrameSet::new();
    for frame in file.combed_frames {
        combed.add(frame, frame_count).map_err(context("combed frames"))?;
    }

    let mut guessing = file.pattern_guessing;
    guessing.failures.sort_by_key(|f| f.section_start);
    guessing.failures.dedup_by_key(|f| f.section_start);
    if let Some(failure) = guessing
        .failures
        .iter()
        .find(|f| sections.get(f.section_start).is_err())
    {
        return Err(ProjectError::invalid_project(format!(
            "pattern guessing failure for frame {}, which does not start a section",
            failure.section_start
        )));
    }

    let mut metrics = file.metrics;
    metrics.validate(frame_count).map_err(context("metrics"))?;
    metrics.sort_fades();

    let ui = validate_ui(file.ui, frame_count)?;

    let state = ProjectState {
        decisions,
        sections,
        presets,
        custom_lists,
        freeze_frames,
        bookmarks,
        combed,
        guessing,
        output: file.output,
    };
    Ok(Project::from_parts(
        state,
        file.source,
        metrics,
        ui,
        max_undo_steps,
    ))
}

fn validate_ui(ui: UiState, frame_count: usize) -> ProjectResult<UiState> {
    check_frame(ui.last_visited_frame, frame_count).map_err(context("last visited frame"))?;
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&ui.zoom) {
        return Err(ProjectError::invalid_project(format!(
            "zoom {} is outside {}..={}",
            ui.zoom, MIN_ZOOM, MAX_ZOOM
        )));
    }
    Ok(ui)
}
