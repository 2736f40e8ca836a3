// vertcut-core/tests/process_videos_tests.rs

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use vertcut_core::config::ProcessingConfig;
use vertcut_core::external::ffprobe_executor::VideoProperties;
use vertcut_core::external::mocks::{MockFfmpegSpawner, MockProbeExecutor, MockSceneDetector};
use vertcut_core::processing::process_videos;
use vertcut_core::scenes::{SceneInterval, TimePoint};

fn interval(start: f64, end: f64) -> SceneInterval {
    SceneInterval::new(TimePoint::new(start, 30.0), TimePoint::new(end, 30.0))
}

fn landscape_props() -> VideoProperties {
    VideoProperties {
        width: 1920,
        height: 1080,
        duration_secs: 600.0,
        fps: 30.0,
        has_audio: true,
    }
}

/// The scene list whose middle short scenes merge into a single (5, 13) run.
fn mergeable_scenes() -> Vec<SceneInterval> {
    vec![
        interval(0.0, 5.0),
        interval(5.0, 7.0),
        interval(7.0, 9.0),
        interval(9.0, 11.0),
        interval(11.0, 13.0),
        interval(13.0, 18.0),
    ]
}

fn shorts_config(output_dir: &Path) -> ProcessingConfig {
    let mut config = ProcessingConfig::new(PathBuf::from("/in"), output_dir.to_path_buf());
    config.min_short_length = 5.0;
    config.max_short_length = 10.0;
    config.max_combined_scene_length = 15.0;
    config.max_retry_depth = 0;
    config.seed = Some(7);
    config
}

fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    File::create(&file_path).expect("Failed to create dummy file");
    file_path
}

#[test]
fn test_render_failure_does_not_abort_sibling_files() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    let first = create_dummy_file(input_dir.path(), "a_first.mkv");
    let second = create_dummy_file(input_dir.path(), "b_second.mkv");
    let config = shorts_config(output_dir.path());

    let probe = MockProbeExecutor::new();
    probe.expect_properties(&first, landscape_props());
    probe.expect_properties(&second, landscape_props());

    let detector = MockSceneDetector::new();
    detector.expect_scenes(&first, mergeable_scenes());
    detector.expect_scenes(&second, mergeable_scenes());

    // First file: its single render attempt fails (retry depth 0). The
    // default policy swallows the exhausted failure and the second file
    // still renders (remaining spawns default to success).
    let spawner = MockFfmpegSpawner::new();
    spawner.push_exit_failure(1);

    let reports = process_videos(&spawner, &probe, &detector, &config, &[first, second])?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].filename, "a_first.mkv");
    assert_eq!(reports[0].shorts_rendered, 0);
    assert_eq!(reports[0].shorts_failed, 1);
    assert_eq!(reports[1].filename, "b_second.mkv");
    assert_eq!(reports[1].shorts_rendered, 1);
    assert_eq!(reports[1].shorts_failed, 0);

    Ok(())
}

#[test]
fn test_probe_failure_skips_file_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    let broken = create_dummy_file(input_dir.path(), "broken.mkv");
    let good = create_dummy_file(input_dir.path(), "good.mkv");
    let config = shorts_config(output_dir.path());

    // No properties registered for "broken": the probe errors and the file
    // is skipped without a report.
    let probe = MockProbeExecutor::new();
    probe.expect_properties(&good, landscape_props());

    let detector = MockSceneDetector::new();
    detector.expect_scenes(&good, mergeable_scenes());

    let spawner = MockFfmpegSpawner::new();

    let reports = process_videos(&spawner, &probe, &detector, &config, &[broken, good])?;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].filename, "good.mkv");
    assert_eq!(reports[0].shorts_rendered, 1);

    Ok(())
}

#[test]
fn test_merged_scene_renders_composite_clip() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    let source = create_dummy_file(input_dir.path(), "match.mkv");
    let config = shorts_config(output_dir.path());

    let probe = MockProbeExecutor::new();
    probe.expect_properties(&source, landscape_props());
    let detector = MockSceneDetector::new();
    detector.expect_scenes(&source, mergeable_scenes());
    let spawner = MockFfmpegSpawner::new();

    let reports = process_videos(&spawner, &probe, &detector, &config, &[source])?;
    assert_eq!(reports[0].shorts_rendered, 1);

    // First spawned command is the render for "match scene-0.mkv": a
    // landscape source cropped square gets the blurred background graph.
    let calls = spawner.get_received_calls();
    assert!(!calls.is_empty());
    let render_args = &calls[0];
    assert!(render_args.iter().any(|a| a == "-filter_complex"));
    assert!(render_args.iter().any(|a| a.contains("gblur")));
    assert!(
        render_args
            .last()
            .is_some_and(|a| a.ends_with("match scene-0.mkv"))
    );

    Ok(())
}

#[test]
fn test_fallback_window_when_no_scene_survives() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    let source = create_dummy_file(input_dir.path(), "quiet.mkv");
    let config = shorts_config(output_dir.path());

    let mut props = landscape_props();
    props.duration_secs = 30.0;

    let probe = MockProbeExecutor::new();
    probe.expect_properties(&source, props);

    // A single sub-minimum scene: nothing survives the merge, so the
    // pipeline falls back to one whole-video window under the source name.
    let detector = MockSceneDetector::new();
    detector.expect_scenes(&source, vec![interval(0.0, 3.0)]);

    let spawner = MockFfmpegSpawner::new();

    let reports = process_videos(&spawner, &probe, &detector, &config, &[source])?;
    assert_eq!(reports[0].shorts_rendered, 1);

    let calls = spawner.get_received_calls();
    assert!(
        calls[0]
            .last()
            .is_some_and(|a| a.ends_with("quiet.mkv") && !a.contains("scene-"))
    );

    Ok(())
}
