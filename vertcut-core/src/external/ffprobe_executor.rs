//! FFprobe integration for media analysis.
//!
//! Extracts the properties the pipeline needs from a source file:
//! dimensions, duration, frame rate and whether an audio track exists.

use std::path::Path;

use ffprobe::{FfProbeError, ffprobe};

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

/// Properties of a source video, probed once per file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    pub fps: f64,
    pub has_audio: bool,
}

/// Abstraction over media probing, for dependency injection in tests.
pub trait ProbeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties>;
}

/// Default implementation backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProbeExecutor for CrateFfprobeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        log::debug!(
            "Running ffprobe for video properties on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => {
                let duration_secs = metadata
                    .format
                    .duration
                    .as_deref()
                    .and_then(|d| d.parse::<f64>().ok())
                    .ok_or_else(|| {
                        CoreError::FfprobeParse(format!(
                            "Failed to parse duration from format for {}",
                            input_path.display()
                        ))
                    })?;

                let video_stream = metadata
                    .streams
                    .iter()
                    .find(|s| s.codec_type.as_deref() == Some("video"))
                    .ok_or_else(|| {
                        CoreError::VideoInfoError(format!(
                            "No video stream found in {}",
                            input_path.display()
                        ))
                    })?;

                let width = video_stream.width.ok_or_else(|| {
                    CoreError::VideoInfoError(format!(
                        "Video stream missing width in {}",
                        input_path.display()
                    ))
                })?;
                let height = video_stream.height.ok_or_else(|| {
                    CoreError::VideoInfoError(format!(
                        "Video stream missing height in {}",
                        input_path.display()
                    ))
                })?;
                if width <= 0 || height <= 0 {
                    return Err(CoreError::VideoInfoError(format!(
                        "Invalid dimensions found in {}: width={}, height={}",
                        input_path.display(),
                        width,
                        height
                    )));
                }

                let fps = parse_frame_rate(&video_stream.avg_frame_rate)
                    .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
                    .unwrap_or_else(|| {
                        log::warn!(
                            "Could not determine frame rate for {}, assuming 30",
                            input_path.display()
                        );
                        30.0
                    });

                let has_audio = metadata
                    .streams
                    .iter()
                    .any(|s| s.codec_type.as_deref() == Some("audio"));

                Ok(VideoProperties {
                    width: width as u32,
                    height: height as u32,
                    duration_secs,
                    fps,
                    has_audio,
                })
            }
            Err(err) => {
                log::error!(
                    "ffprobe failed for video properties on {}: {:?}",
                    input_path.display(),
                    err
                );
                Err(map_ffprobe_error(err, "video properties"))
            }
        }
    }
}

/// Parses an ffprobe frame-rate fraction ("30000/1001") into frames per
/// second. Returns None for malformed or zero rates.
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let (num, den) = match raw.split_once('/') {
        Some((num, den)) => (num.parse::<f64>().ok()?, den.parse::<f64>().ok()?),
        None => (raw.parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::FfprobeParse(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("60"), Some(60.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate(""), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }
}
