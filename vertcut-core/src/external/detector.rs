//! Scene boundary detection via ffmpeg's scdet filter.
//!
//! The pipeline only consumes an ordered list of scene intervals; the
//! detection itself is delegated to an ffmpeg run whose stderr is parsed
//! for scdet metadata. The trait seam lets tests feed synthetic scene
//! lists instead.

use std::cmp::Ordering;
use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use regex::Regex;

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarSpawner};
use crate::external::ffprobe_executor::VideoProperties;
use crate::scenes::{SceneInterval, TimePoint};

/// Abstraction over scene boundary detection.
pub trait SceneDetector {
    /// Returns the ordered list of detected scenes for a source file.
    fn detect_scenes(
        &self,
        input_path: &Path,
        threshold: f32,
        props: &VideoProperties,
    ) -> CoreResult<Vec<SceneInterval>>;
}

/// Default detector: one ffmpeg pass with the scdet filter.
#[derive(Debug, Clone, Default)]
pub struct ScdetSceneDetector;

impl ScdetSceneDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SceneDetector for ScdetSceneDetector {
    fn detect_scenes(
        &self,
        input_path: &Path,
        threshold: f32,
        props: &VideoProperties,
    ) -> CoreResult<Vec<SceneInterval>> {
        // Ultra-short videos are a single scene; the filter pass would only
        // produce noise.
        if props.duration_secs < 2.0 {
            log::info!("Skipping scene detection for ultra-short video");
            return Ok(boundaries_to_intervals(
                Vec::new(),
                props.duration_secs,
                props.fps,
            ));
        }

        let threshold_normalized = threshold / 100.0;
        let scene_filter = format!(
            "scdet=threshold={threshold_normalized}:sc_pass=1,metadata=print"
        );

        let mut cmd = FfmpegCommand::new();
        cmd.arg("-hide_banner")
            .args(["-loglevel", "info"])
            .input(input_path.to_string_lossy().as_ref())
            .args(["-vf", &scene_filter])
            .args(["-fps_mode", "passthrough"])
            .args(["-f", "null", "-"]);

        log::debug!("Running scene detection command: {cmd:?}");

        let mut child = SidecarSpawner.spawn(cmd)?;
        let mut output = String::new();
        child.handle_events(|event| {
            match event {
                FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                    output.push_str(&line);
                    output.push('\n');
                }
                _ => {}
            }
            Ok(())
        })?;

        let status = child.wait()?;
        if !status.success() {
            return Err(command_failed_error(
                "ffmpeg (scene detection)",
                status,
                "Scene detection process failed",
            ));
        }

        let timestamps = parse_scene_timestamps(&output, threshold);
        log::debug!("Found {} raw scene boundaries", timestamps.len());

        let intervals = boundaries_to_intervals(timestamps, props.duration_secs, props.fps);
        if intervals.is_empty() {
            return Err(CoreError::SceneDetection(format!(
                "No usable scene boundaries for {}",
                input_path.display()
            )));
        }
        Ok(intervals)
    }
}

/// Extracts scene-change timestamps from scdet metadata output.
///
/// The scdet filter with metadata=print reports a timestamp and a scene
/// score per detected change; entries below the score floor are dropped.
fn parse_scene_timestamps(output: &str, threshold: f32) -> Vec<f64> {
    let time_re = Regex::new(r"lavfi\.time=(\d+\.?\d*)").expect("valid regex");
    let score_re = Regex::new(r"lavfi\.scdet\.scene_score=(\d+\.?\d*)").expect("valid regex");

    let timestamps: Vec<f64> = time_re
        .captures_iter(output)
        .filter_map(|cap| cap.get(1)?.as_str().parse().ok())
        .collect();
    let scores: Vec<f64> = score_re
        .captures_iter(output)
        .filter_map(|cap| cap.get(1)?.as_str().parse().ok())
        .collect();

    let min_score = f64::from(threshold / 100.0);
    let len = timestamps.len().min(scores.len());
    let mut scene_timestamps: Vec<f64> = (0..len)
        .filter(|&i| scores[i] >= min_score)
        .map(|i| timestamps[i])
        .collect();

    scene_timestamps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    scene_timestamps
}

/// Turns an ordered list of boundary timestamps into scene intervals
/// spanning the whole video.
///
/// 0.0 is always the first boundary (a leading boundary very close to zero
/// is folded into it) and the video duration is always the last. Degenerate
/// windows are dropped.
fn boundaries_to_intervals(timestamps: Vec<f64>, duration: f64, fps: f64) -> Vec<SceneInterval> {
    let mut boundaries = vec![0.0];
    for ts in timestamps {
        if ts > 0.1 && ts < duration && ts > *boundaries.last().expect("non-empty") {
            boundaries.push(ts);
        }
    }
    if duration > *boundaries.last().expect("non-empty") {
        boundaries.push(duration);
    }

    boundaries
        .windows(2)
        .filter(|pair| pair[1] > pair[0])
        .map(|pair| SceneInterval::new(TimePoint::new(pair[0], fps), TimePoint::new(pair[1], fps)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scene_timestamps_filters_by_score() {
        let output = "\
[Parsed_metadata_1] lavfi.time=4.5\n\
[Parsed_metadata_1] lavfi.scdet.scene_score=0.90\n\
[Parsed_metadata_1] lavfi.time=9.0\n\
[Parsed_metadata_1] lavfi.scdet.scene_score=0.05\n\
[Parsed_metadata_1] lavfi.time=15.25\n\
[Parsed_metadata_1] lavfi.scdet.scene_score=0.60\n";
        let timestamps = parse_scene_timestamps(output, 27.0);
        assert_eq!(timestamps, vec![4.5, 15.25]);
    }

    #[test]
    fn test_parse_scene_timestamps_empty_output() {
        assert!(parse_scene_timestamps("", 27.0).is_empty());
    }

    #[test]
    fn test_boundaries_to_intervals_spans_whole_video() {
        let intervals = boundaries_to_intervals(vec![5.0, 12.0], 20.0, 30.0);
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0].start.seconds, 0.0);
        assert_eq!(intervals[0].end.seconds, 5.0);
        assert_eq!(intervals[1].end.seconds, 12.0);
        assert_eq!(intervals[2].end.seconds, 20.0);
        assert_eq!(intervals[2].end.frame, 600);
    }

    #[test]
    fn test_boundaries_to_intervals_folds_near_zero_boundary() {
        let intervals = boundaries_to_intervals(vec![0.04, 8.0], 16.0, 30.0);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start.seconds, 0.0);
        assert_eq!(intervals[0].end.seconds, 8.0);
    }

    #[test]
    fn test_boundaries_to_intervals_no_boundaries() {
        let intervals = boundaries_to_intervals(Vec::new(), 10.0, 30.0);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].duration(), 10.0);
    }
}
