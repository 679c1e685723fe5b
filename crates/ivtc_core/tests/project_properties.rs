//! End-to-end properties of a project driven through its public API.

use std::sync::Arc;

use parking_lot::Mutex;

use ivtc_core::frames::FrameNumberMapper;
use ivtc_core::models::{Match, PositionInFilterChain, SourceInfo, UseThirdNMatch};
use ivtc_core::patterns::GuessConfig;
use ivtc_core::preview::{
    DecodedFrame, FrameCallback, FrameSink, FrameSource, FrameSourceError, PreviewSession,
};
use ivtc_core::schema;
use ivtc_core::script::PipelineDescription;
use ivtc_core::{Project, ProjectError};

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

/// Deterministic decimation flags with roughly one drop in five.
fn scattered_flags(frame_count: usize, seed: u64) -> Vec<bool> {
    let mut state = seed;
    (0..frame_count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % 5 == 0
        })
        .collect()
}

#[test]
fn cycling_returns_to_c_and_skips_p_and_u() {
    let mut project = project(5);
    let mut seen = Vec::new();
    for _ in 0..3 {
        project.cycle_match(0).unwrap();
        seen.push(project.get_match(0).unwrap());
    }
    assert_eq!(seen, vec![Match::B, Match::N, Match::C]);

    for m in [Match::P, Match::U] {
        project.set_match(1, m).unwrap();
        assert!(project.cycle_match(1).unwrap().is_empty());
        assert_eq!(project.get_match(1).unwrap(), m);
    }
}

#[test]
fn mapper_round_trips_every_frame() {
    for seed in [1, 7, 42] {
        let flags = scattered_flags(997, seed);
        let mapper = FrameNumberMapper::build(&flags);

        for output in 0..mapper.output_frame_count() {
            let source = mapper.to_source(output).unwrap();
            assert_eq!(mapper.to_output(source).unwrap(), output);
        }
        for (source, &decimated) in flags.iter().enumerate() {
            match mapper.output_position(source) {
                Err(ProjectError::NotRepresented { frame }) => {
                    assert!(decimated);
                    assert_eq!(frame, source);
                }
                Ok(output) => {
                    assert!(!decimated);
                    assert_eq!(mapper.to_source(output).unwrap(), source);
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }
}

#[test]
fn frame_rate_totals_cover_the_clip() {
    let flags = scattered_flags(1003, 9);
    let mapper = FrameNumberMapper::build(&flags);
    let rates = mapper.frame_rates();

    let total: usize = (0..=5).map(|d| rates.frames_with_dropped(d)).sum();
    assert_eq!(total, 1003);

    let ranges = rates.ranges();
    assert_eq!(ranges.first().map(|r| r.first), Some(0));
    assert_eq!(ranges.last().map(|r| r.last), Some(1002));
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].last + 1, pair[1].first);
        assert_ne!(pair[0].dropped, pair[1].dropped);
    }
}

#[test]
fn patterns_fill_a_fifteen_frame_section() {
    let mut project = project(20);
    project.add_section(15).unwrap();
    project.set_section_matches_from_pattern(0, "cccnn").unwrap();
    project
        .set_section_decimation_from_pattern(0, "kkkkd")
        .unwrap();

    assert_eq!(
        project.decisions().match_string(0, 14).unwrap(),
        "cccnncccnncccnn"
    );
    assert_eq!(project.decisions().decimated_frames(), vec![4, 9, 14]);
    assert_eq!(project.decisions().match_string(15, 19).unwrap(), "ccccc");
    assert_eq!(project.output_frame_count(), 17);
}

#[test]
fn timecodes_stay_exact_over_long_clips() {
    let frame_count = 300_000;
    let mut project = project(frame_count);
    project
        .set_range_decimation_from_pattern(0, frame_count - 1, "kkkkd")
        .unwrap();

    let v2 = project.timecodes_v2();
    let mut lines = v2.lines();
    assert_eq!(lines.next(), Some("# timecode format v2"));
    let last = lines.last().unwrap();
    // 239999 frames of 1001/24 ms each.
    let expected_units: u64 = 239_999 * 75_075;
    let whole = expected_units / 1800;
    assert!(last.starts_with(&format!("{}.", whole)), "{last}");

    assert_eq!(project.frame_to_time(24).unwrap(), "0:00:01.001");
}

#[test]
fn section_add_and_delete_round_trip() {
    let mut project = project(100);
    project.add_section(40).unwrap();
    let before = project.sections().clone();

    project.add_section(70).unwrap();
    project.delete_section(70).unwrap();
    assert_eq!(project.sections(), &before);

    let state = project.state().clone();
    assert!(matches!(
        project.delete_section(0),
        Err(ProjectError::ProtectedSection)
    ));
    assert_eq!(project.state(), &state);
}

#[test]
fn undo_and_redo_restore_state() {
    let mut project = project(50);
    project.add_preset("deint").unwrap();
    project.commit("Add preset");

    let before = project.state().clone();
    project.set_range_matches_from_pattern(0, 49, "ccnnc").unwrap();
    project.add_section(25).unwrap();
    project
        .add_custom_list("fix", PositionInFilterChain::PostFieldMatch)
        .unwrap();
    project.commit("Edit");
    let after = project.state().clone();

    assert_eq!(project.undo(), "Edit");
    assert_eq!(project.state(), &before);
    assert_eq!(project.redo(), "Edit");
    assert_eq!(project.state(), &after);
}

#[test]
fn journal_evicts_oldest_steps() {
    let mut project = project(10);
    project.set_max_undo_steps(3);
    for frame in 0..5 {
        project.set_match(frame, Match::N).unwrap();
        project.commit(&format!("frame {}", frame));
    }

    let mut undone = Vec::new();
    loop {
        let description = project.undo();
        if description.is_empty() {
            break;
        }
        undone.push(description);
    }
    assert_eq!(undone, vec!["frame 4", "frame 3", "frame 2"]);
    assert_eq!(project.decisions().match_string(0, 4).unwrap(), "nnccc");
}

#[test]
fn short_sections_fail_guessing_untouched() {
    let mut project = project(40);
    project.add_section(35).unwrap();
    project
        .set_range_matches_from_pattern(0, 39, "cccnn")
        .unwrap();
    project.set_match(36, Match::U).unwrap();
    let before = project.decisions().match_string(35, 39).unwrap();

    let (report, _) = project.guess_section_patterns(35).unwrap();
    assert_eq!(report.guessed.len(), 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(project.decisions().match_string(35, 39).unwrap(), before);
    assert!(!project.decisions().decimated_frames().iter().any(|&f| f >= 35));
}

#[test]
fn guessing_from_matches_decimates_duplicates() {
    let mut project = project(30);
    project.add_section(25).unwrap();
    project
        .set_range_matches_from_pattern(0, 24, "cccnn")
        .unwrap();
    project.set_guess_config(GuessConfig {
        third_n_match: UseThirdNMatch::Never,
        ..Default::default()
    });

    let (report, changes) = project.guess_project_patterns().unwrap();
    assert!(report.any_success());
    assert!(changes.touches_decimation());
    assert_eq!(project.decisions().decimated_frames(), vec![4, 9, 14, 19, 24]);
    assert_eq!(project.output_frame_count(), 25);
}

#[test]
fn custom_list_overlap_is_per_list() {
    let mut project = project(100);
    for name in ["a", "b"] {
        project
            .add_custom_list(name, PositionInFilterChain::PostSource)
            .unwrap();
    }

    project.add_custom_list_range("a", 0, 10).unwrap();
    assert!(matches!(
        project.add_custom_list_range("a", 5, 15),
        Err(ProjectError::OverlappingRange { .. })
    ));
    project.add_custom_list_range("b", 5, 15).unwrap();
    project.add_custom_list_range("b", 0, 4).unwrap();
}

#[test]
fn preset_rename_reaches_every_user() {
    let mut project = project(100);
    project.add_preset("deint").unwrap();
    project.add_section(50).unwrap();
    project.set_section_preset(50, "deint").unwrap();
    project
        .add_custom_list("fix", PositionInFilterChain::PostDecimate)
        .unwrap();
    project.set_custom_list_preset("fix", Some("deint")).unwrap();

    project.rename_preset("deint", "qtgmc").unwrap();

    assert_eq!(project.sections().get(50).unwrap().presets, vec!["qtgmc"]);
    assert_eq!(
        project.custom_lists().get("fix").unwrap().preset.as_deref(),
        Some("qtgmc")
    );
    assert!(project.is_preset_in_use("qtgmc").unwrap());
    assert!(!project.presets().contains("deint"));
}

#[test]
fn orphan_fields_are_stable_across_refreshes() {
    let mut project = project(30);
    project
        .set_range_matches_from_pattern(0, 29, "ccnnn")
        .unwrap();
    project
        .set_range_decimation_from_pattern(0, 29, "kkdkk")
        .unwrap();
    let first: Vec<_> = project.orphan_fields().fields().cloned().collect();
    let second: Vec<_> = project.orphan_fields().fields().cloned().collect();
    assert_eq!(first, second);

    // A change that is reverted leaves the same orphans behind.
    project.set_match(12, Match::B).unwrap();
    project.set_match(12, Match::N).unwrap();
    let third: Vec<_> = project.orphan_fields().fields().cloned().collect();
    assert_eq!(first, third);

    project.commit("Patterns");
    project.undo();
    project.redo();
    let fourth: Vec<_> = project.orphan_fields().fields().cloned().collect();
    assert_eq!(first, fourth);
}

#[test]
fn project_files_round_trip_and_reject_damage() {
    let mut project = project(30);
    project.add_preset_with_body("deint", "clip = core.std.Deint(clip)").unwrap();
    project.add_section(10).unwrap();
    project.set_section_preset(10, "deint").unwrap();
    project
        .set_range_decimation_from_pattern(0, 29, "kkkdk")
        .unwrap();
    project.add_bookmark(12, "fade").unwrap();

    let json = schema::to_json(&project).unwrap();
    let loaded = schema::from_json(&json, 100).unwrap();
    assert_eq!(loaded.state(), project.state());
    assert_eq!(schema::to_json(&loaded).unwrap(), json);

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["version"] = serde_json::json!(99);
    let damaged = serde_json::to_string(&value).unwrap();
    assert!(matches!(
        schema::from_json(&damaged, 100),
        Err(ProjectError::InvalidProject(_))
    ));

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["matches"] = serde_json::json!("ccc");
    let damaged = serde_json::to_string(&value).unwrap();
    assert!(schema::from_json(&damaged, 100).is_err());

    assert!(schema::from_json("{ not json", 100).is_err());
}

/// Frame source that holds every request until told to answer.
#[derive(Default)]
struct HeldSource {
    requests: Mutex<Vec<(usize, FrameCallback)>>,
}

impl HeldSource {
    fn answer_all(&self) {
        let requests: Vec<_> = self.requests.lock().drain(..).collect();
        for (frame, callback) in requests {
            callback(Ok(DecodedFrame {
                frame,
                width: 2,
                height: 2,
                data: vec![0; 12],
            }));
        }
    }
}

impl FrameSource for HeldSource {
    fn set_pipeline(&self, _description: &PipelineDescription) -> Result<(), FrameSourceError> {
        Ok(())
    }

    fn request_frame(&self, frame: usize, callback: FrameCallback) {
        self.requests.lock().push((frame, callback));
    }
}

#[test]
fn stale_preview_frames_are_dropped() {
    let source = Arc::new(HeldSource::default());
    let shown = Arc::new(Mutex::new(Vec::new()));
    let sink_shown = Arc::clone(&shown);
    let sink: FrameSink = Arc::new(move |result| {
        if let Ok(frame) = result {
            sink_shown.lock().push(frame.frame);
        }
    });
    let session = PreviewSession::new(Arc::clone(&source), sink);

    session.request_frames(&[10, 11, 12]);
    session.request_frames(&[20]);
    let worker = Arc::clone(&source);
    std::thread::spawn(move || worker.answer_all())
        .join()
        .unwrap();
    assert_eq!(*shown.lock(), vec![20]);

    session.request_frames(&[30]);
    session.load_project(&project(40), false, false).unwrap();
    source.answer_all();
    assert_eq!(*shown.lock(), vec![20]);
}
