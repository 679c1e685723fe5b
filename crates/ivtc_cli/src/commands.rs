//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use ivtc_core::config::{SearchSettings, Settings};
use ivtc_core::models::SourceInfo;
use ivtc_core::schema;
use ivtc_core::script::{format_stages_pretty, PipelineBuilder};
use ivtc_core::{ImportSelection, Project, ProjectResult};

use crate::args::{Command, SearchKind, TimecodeFormat};

/// Run one command. Text meant for the user is returned, not printed.
pub fn run(command: &Command, settings: &Settings) -> Result<String> {
    match command {
        Command::New {
            video,
            frame_count,
            project,
            filter,
        } => {
            let source = SourceInfo {
                path: video.clone(),
                filter: filter
                    .clone()
                    .unwrap_or_else(|| settings.script.source_filter.clone()),
                frame_count: *frame_count,
                ..Default::default()
            };
            let mut created = Project::new(source)?;
            created.set_guess_config(settings.pattern_guessing.clone());
            created.clear_history();
            save_project(&mut created, project)?;
            Ok(format!(
                "Created {} ({} frames)",
                project.display(),
                frame_count
            ))
        }
        Command::Info { project } => {
            let loaded = load_project(project, settings)?;
            Ok(info(&loaded))
        }
        Command::Matches {
            project,
            first,
            last,
            pattern,
        } => {
            let mut loaded = load_project(project, settings)?;
            let changes = loaded.set_range_matches_from_pattern(*first, *last, pattern)?;
            let summary = format!("Applied match pattern '{}' to {}-{}", pattern, first, last);
            if !changes.is_empty() {
                loaded.commit(&summary);
                save_project(&mut loaded, project)?;
            }
            Ok(summary)
        }
        Command::Decimate {
            project,
            first,
            last,
            pattern,
        } => {
            let mut loaded = load_project(project, settings)?;
            let changes = loaded.set_range_decimation_from_pattern(*first, *last, pattern)?;
            let summary = format!(
                "Applied decimation pattern '{}' to {}-{}",
                pattern, first, last
            );
            if !changes.is_empty() {
                loaded.commit(&summary);
                save_project(&mut loaded, project)?;
            }
            Ok(summary)
        }
        Command::Section { project, frame } => {
            let mut loaded = load_project(project, settings)?;
            loaded.add_section(*frame)?;
            loaded.commit(&format!("Add section at {}", frame));
            save_project(&mut loaded, project)?;
            Ok(format!("Added section at {}", frame))
        }
        Command::Guess { project, section } => {
            let mut loaded = load_project(project, settings)?;
            let (report, changes) = match section {
                Some(start) => loaded.guess_section_patterns(*start)?,
                None => loaded.guess_project_patterns()?,
            };
            if !changes.is_empty() {
                loaded.commit("Guess patterns");
                save_project(&mut loaded, project)?;
            }
            let mut out = format!(
                "{} section(s) guessed, {} failed",
                report.guessed.len(),
                report.failures.len()
            );
            for failure in &report.failures {
                out.push_str(&format!(
                    "\n  section {}: {}",
                    failure.section_start, failure.reason
                ));
            }
            Ok(out)
        }
        Command::Orphans { project } => {
            let mut loaded = load_project(project, settings)?;
            let lines: Vec<String> = loaded
                .orphan_fields()
                .fields()
                .map(|f| {
                    let decimated = if f.decimated { " (decimated)" } else { "" };
                    format!("{} {} {} field{}", f.frame, f.match_, f.field, decimated)
                })
                .collect();
            if lines.is_empty() {
                Ok("No orphan fields".to_string())
            } else {
                Ok(lines.join("\n"))
            }
        }
        Command::Search { project, kind } => {
            let loaded = load_project(project, settings)?;
            let hits = search(&loaded, *kind, &settings.search)?;
            if hits.is_empty() {
                Ok("Nothing found".to_string())
            } else {
                Ok(hits.join("\n"))
            }
        }
        Command::Timecodes {
            project,
            format,
            output,
        } => {
            let loaded = load_project(project, settings)?;
            let text = match format {
                TimecodeFormat::V1 => loaded.timecodes_v1(),
                TimecodeFormat::V2 => loaded.timecodes_v2(),
            };
            emit(text, output.as_deref(), settings)
        }
        Command::Keyframes { project, output } => {
            let loaded = load_project(project, settings)?;
            emit(loaded.keyframes_v1(), output.as_deref(), settings)
        }
        Command::Pipeline {
            project,
            json,
            preview,
            output,
        } => {
            let loaded = load_project(project, settings)?;
            let mut builder = PipelineBuilder::new(&loaded);
            if *preview {
                builder = builder.preview(settings.script.preview_freeze_frames);
            }
            let description = builder.build()?;
            if *json && settings.logging.show_pipeline_pretty {
                tracing::info!("Pipeline:\n{}", format_stages_pretty(&description));
            }
            let text = if *json {
                serde_json::to_string_pretty(&description)
                    .context("Failed to serialize pipeline")?
            } else {
                format_stages_pretty(&description)
            };
            emit(text, output.as_deref(), settings)
        }
        Command::FrameToTime { project, frame } => {
            let loaded = load_project(project, settings)?;
            Ok(loaded.frame_to_time(*frame)?)
        }
        Command::Import { project, from } => {
            let mut loaded = load_project(project, settings)?;
            let other = load_project(from, settings)?;
            let changes = loaded.import_from(&other, ImportSelection::all())?;
            if !changes.is_empty() {
                loaded.commit(&format!("Import from {}", from.display()));
                save_project(&mut loaded, project)?;
            }
            Ok(format!("Imported settings from {}", from.display()))
        }
    }
}

pub fn load_project(path: &Path, settings: &Settings) -> Result<Project> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read project {}", path.display()))?;
    let project = schema::from_json(&json, settings.undo.max_steps)
        .with_context(|| format!("Failed to load project {}", path.display()))?;
    tracing::debug!("Loaded project {}", path.display());
    Ok(project)
}

/// Write the project through a temp file, then rename.
pub fn save_project(project: &mut Project, path: &Path) -> Result<()> {
    let json = schema::to_json(project)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    project.mark_saved();
    tracing::info!("Saved project {}", path.display());
    Ok(())
}

/// Write `text` to `output`, or hand it back for stdout.
///
/// Relative output paths land in the configured output folder.
fn emit(text: String, output: Option<&Path>, settings: &Settings) -> Result<String> {
    match output {
        Some(path) => {
            let path = if path.is_relative() {
                Path::new(&settings.paths.output_folder).join(path)
            } else {
                path.to_path_buf()
            };
            let path = path.as_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!("Wrote {}", path.display()))
        }
        None => Ok(text.trim_end().to_string()),
    }
}

/// Every frame (or range) the search finds, in clip order.
fn search(project: &Project, kind: SearchKind, limits: &SearchSettings) -> Result<Vec<String>> {
    let frames = match kind {
        SearchKind::Mics => {
            let first = project
                .decisions()
                .get_match(0)
                .ok()
                .and_then(|m| project.metrics().mic(0, m))
                .is_some_and(|mic| mic >= limits.minimum_mic);
            scan(first, |f| project.find_next_high_mic(f, limits.minimum_mic))?
        }
        SearchKind::DMetrics => {
            let first = project
                .metrics()
                .decimate_metric(0)
                .is_some_and(|d| d >= limits.minimum_dmetric);
            scan(first, |f| {
                project.find_next_high_dmetric(f, limits.minimum_dmetric)
            })?
        }
        SearchKind::CMatches => {
            return Ok(project
                .c_match_sequences(limits.c_match_minimum)
                .iter()
                .map(ToString::to_string)
                .collect());
        }
        SearchKind::Fades => {
            return Ok(project
                .interlaced_fade_ranges(limits.fade_ignore_gaps)
                .iter()
                .map(ToString::to_string)
                .collect());
        }
    };
    Ok(frames.iter().map(ToString::to_string).collect())
}

/// Follow a find-next search from frame 0 to the end.
fn scan(
    first: bool,
    next: impl Fn(usize) -> ProjectResult<Option<usize>>,
) -> Result<Vec<usize>> {
    let mut frames = Vec::new();
    if first {
        frames.push(0);
    }
    let mut frame = 0;
    while let Some(found) = next(frame)? {
        frames.push(found);
        frame = found;
    }
    Ok(frames)
}

fn info(project: &Project) -> String {
    let source = project.source();
    let mut lines = vec![
        format!("Source: {} ({})", source.path, source.filter),
        format!(
            "Frames: {} source, {} output",
            project.frame_count(),
            project.output_frame_count()
        ),
        format!("Sections: {}", project.sections().len()),
        format!("Presets: {}", project.presets().len()),
        format!("Custom lists: {}", project.custom_lists().len()),
        format!("Freeze frames: {}", project.freeze_frames().len()),
        format!("Bookmarks: {}", project.bookmarks().len()),
    ];
    let rates = project.frame_rates();
    for dropped in 0..=5 {
        let frames = rates.frames_with_dropped(dropped);
        if frames > 0 {
            lines.push(format!(
                "  {} dropped per cycle: {} frames",
                dropped, frames
            ));
        }
    }
    let failures = &project.guessing().failures;
    if !failures.is_empty() {
        lines.push(format!("Guessing failures: {}", failures.len()));
    }
    lines.join("\n")
}
