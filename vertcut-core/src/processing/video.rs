//! Main shorts-generation orchestration.
//!
//! For each source video: probe properties, detect scenes, merge and rank
//! them, then cut, compose and render one short per surviving interval.
//! Scene diagnostics are logged as they are computed, before any rendering
//! starts, so the selection is visible even when encoding later fails.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compose::{ComposedClip, compose_clip};
use crate::config::ProcessingConfig;
use crate::error::CoreResult;
use crate::external::detector::SceneDetector;
use crate::external::ffmpeg::extract_poster_frame;
use crate::external::ffmpeg_executor::FfmpegSpawner;
use crate::external::ffprobe_executor::{ProbeExecutor, VideoProperties};
use crate::render::render_clip;
use crate::scenes::{RankingStrategy, SceneInterval, combine_scenes, rank_scenes};
use crate::utils::get_filename_safe;

/// Outcome of processing one source video.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub filename: String,
    pub shorts_rendered: usize,
    pub shorts_failed: usize,
    pub elapsed: Duration,
}

/// Processes a list of source videos according to the provided configuration.
///
/// The generic parameters inject the external collaborators (ffmpeg
/// spawner, media probe, scene detector) so the whole pipeline can run
/// against mocks in tests. Per-file failures are logged and skipped; an
/// error is only returned for fatal conditions (or an exhausted render
/// under the `Propagate` failure policy).
pub fn process_videos<S, P, D>(
    spawner: &S,
    probe: &P,
    detector: &D,
    config: &ProcessingConfig,
    files_to_process: &[PathBuf],
) -> CoreResult<Vec<ProcessReport>>
where
    S: FfmpegSpawner,
    P: ProbeExecutor,
    D: SceneDetector,
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reports = Vec::new();

    for input_path in files_to_process {
        let file_start_time = Instant::now();

        let filename = match get_filename_safe(input_path) {
            Ok(name) => name,
            Err(e) => {
                log::error!("Skipping input with unusable path: {e}");
                continue;
            }
        };

        log::info!("Processing: {filename}");

        let props = match probe.get_video_properties(input_path) {
            Ok(props) => props,
            Err(e) => {
                log::error!("Failed to get video properties for {filename}: {e}. Skipping file.");
                log::info!("----------------------------------------");
                continue;
            }
        };

        log::info!("Detecting scenes...");
        let scenes = match detector.detect_scenes(input_path, config.detection_threshold, &props) {
            Ok(scenes) => scenes,
            Err(e) => {
                log::error!("Scene detection failed for {filename}: {e}. Skipping file.");
                log::info!("----------------------------------------");
                continue;
            }
        };
        log::info!("Scenes list:");
        log_scene_list("Scene", &scenes);

        let combined = combine_scenes(&scenes, config);
        log::info!("Combined scenes list:");
        log_scene_list("Combined Scene", &combined);

        let ranked = rank_scenes(&combined, &RankingStrategy::Duration, config.scene_limit);
        log::info!("Truncated sorted combined scenes list:");
        log_scene_list("Scene", &ranked);

        let mut rendered = 0;
        let mut failed = 0;

        if ranked.is_empty() {
            // No merged scene survived; fall back to one randomized window
            // over the whole video, rendered under the source's own name.
            log::info!("No combined scenes met the length floor; using a whole-video window");
            let clip = fallback_window(input_path, &props, config, &mut rng);
            let destination = config.output_dir.join(&filename);
            match render_clip(spawner, &clip, &destination, config)? {
                outcome if outcome.succeeded => {
                    rendered += 1;
                    write_poster(spawner, &clip, &destination);
                }
                _ => failed += 1,
            }
        } else {
            for (index, scene) in ranked.iter().enumerate() {
                let clip = scene_window(input_path, &props, scene, config, &mut rng);
                let destination = config.output_dir.join(scene_output_name(input_path, index));
                match render_clip(spawner, &clip, &destination, config)? {
                    outcome if outcome.succeeded => {
                        rendered += 1;
                        write_poster(spawner, &clip, &destination);
                    }
                    _ => failed += 1,
                }
            }
        }

        reports.push(ProcessReport {
            filename,
            shorts_rendered: rendered,
            shorts_failed: failed,
            elapsed: file_start_time.elapsed(),
        });

        log::info!("----------------------------------------");
    }

    Ok(reports)
}

/// Logs one interval list in the diagnostic format: index, duration,
/// start/end timecodes and frame numbers.
fn log_scene_list(label: &str, scenes: &[SceneInterval]) {
    for (i, scene) in scenes.iter().enumerate() {
        log::info!(
            "    {label} {:2}: Duration {:5.1} Start {} / Frame {}, End {} / Frame {}",
            i + 1,
            scene.duration(),
            scene.start.timecode(),
            scene.start.frame,
            scene.end.timecode(),
            scene.end.frame,
        );
    }
}

/// Picks a randomized short window inside a merged scene and composes it.
fn scene_window(
    source: &Path,
    props: &VideoProperties,
    scene: &SceneInterval,
    config: &ProcessingConfig,
    rng: &mut StdRng,
) -> ComposedClip {
    let upper = config.max_short_length.min(scene.duration());
    let short_length = sample_range(rng, config.min_short_length, upper);

    let min_start = scene.start.seconds;
    let max_start = scene.end.seconds - short_length;
    let start = sample_range(rng, min_start, max_start);

    compose_clip(source, props, start, short_length, config)
}

/// Whole-video fallback when merging produced no candidates: a randomized
/// window adapted to the video's duration, starting within the first ten
/// seconds when the video is long enough.
fn fallback_window(
    source: &Path,
    props: &VideoProperties,
    config: &ProcessingConfig,
    rng: &mut StdRng,
) -> ComposedClip {
    let short_length = sample_range(rng, config.min_short_length, config.max_short_length);
    let adapted_length = if props.duration_secs < config.max_short_length {
        short_length.min(props.duration_secs.floor())
    } else {
        short_length
    };

    let min_start = (props.duration_secs.floor() - adapted_length).min(10.0).max(0.0);
    let max_start = (props.duration_secs - adapted_length).floor().max(min_start);
    let start = sample_range(rng, min_start, max_start);

    compose_clip(source, props, start, adapted_length, config)
}

/// Uniform sample from [low, high], tolerating an empty or inverted range.
fn sample_range(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    if high > low { rng.gen_range(low..=high) } else { low }
}

/// Output filename for the Nth ranked scene of a source video.
fn scene_output_name(source: &Path, index: usize) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| "short".to_string(), |s| s.to_string_lossy().to_string());
    let extension = source
        .extension()
        .map_or_else(|| "mp4".to_string(), |e| e.to_string_lossy().to_string());
    format!("{stem} scene-{index}.{extension}")
}

/// Writes a poster thumbnail next to a rendered short.
///
/// Extracts the frame at the middle of the rendered window and replays the
/// clip's transform plan on it in software. Poster problems are logged and
/// never fail the render.
fn write_poster<S: FfmpegSpawner>(spawner: &S, clip: &ComposedClip, destination: &Path) {
    let poster_path = destination.with_extension("jpg");
    let midpoint = clip.start + clip.duration / 2.0;

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to create scratch dir for poster: {e}");
            return;
        }
    };
    let frame_path = scratch.path().join("poster_frame.png");

    if let Err(e) = extract_poster_frame(spawner, &clip.source, midpoint, &frame_path) {
        log::warn!("Failed to extract poster frame for {}: {e}", destination.display());
        return;
    }

    match image::open(&frame_path) {
        Ok(frame) => {
            let poster = crate::frame::render_poster(clip, &frame.to_rgb8());
            if let Err(e) = poster.save(&poster_path) {
                log::warn!("Failed to write poster {}: {e}", poster_path.display());
            }
        }
        Err(e) => {
            log::warn!("Failed to load extracted poster frame: {e}");
        }
    }
}
