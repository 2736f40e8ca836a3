//! Clip composition: turning a source sub-range into a render plan.
//!
//! A `ComposedClip` is a pure value describing everything the renderer
//! needs: the source sub-range, an ordered sequence of named transform
//! stages for the foreground, an optional blurred background layer, and the
//! output canvas. Stages are data, not effects; applying one conceptually
//! yields a new clip. The ffmpeg module lowers the plan to a filter graph
//! and the frame module replays it in software for poster thumbnails.

use std::path::{Path, PathBuf};

use crate::config::ProcessingConfig;
use crate::external::ffprobe_executor::VideoProperties;
use crate::geometry::{CropRect, crop_rect, select_background_resolution};

/// Gaussian blur strength for the background layer.
pub const BLUR_SIGMA: f32 = 8.0;

/// Base resolution the background is blurred at before the final upscale.
const BLUR_BASE_WIDTH: u32 = 720;
const BLUR_BASE_HEIGHT_PORTRAIT: u32 = 1280;

/// One step of a clip's transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStage {
    /// Cut a window out of the frame.
    Crop(CropRect),
    /// Resize to exact dimensions.
    Scale { width: u32, height: u32 },
    /// Resize to a width, preserving aspect (height rounded to even).
    ScaleToWidth(u32),
    /// Gaussian blur, applied independently per frame.
    Blur { sigma: f32 },
}

/// Output dimensions of a stage given its input dimensions.
#[must_use]
pub fn stage_output_size(input: (u32, u32), stage: &TransformStage) -> (u32, u32) {
    match *stage {
        TransformStage::Crop(rect) => (rect.width, rect.height),
        TransformStage::Scale { width, height } => (width, height),
        TransformStage::ScaleToWidth(width) => {
            let (w, h) = input;
            let scaled = f64::from(width) * f64::from(h) / f64::from(w);
            // Match ffmpeg's scale=W:-2 rounding to the nearest even height.
            let even = ((scaled / 2.0).round() * 2.0) as u32;
            (width, even.max(2))
        }
        TransformStage::Blur { .. } => input,
    }
}

/// Dimensions after running a whole stage sequence.
#[must_use]
pub fn stages_output_size(input: (u32, u32), stages: &[TransformStage]) -> (u32, u32) {
    stages.iter().fold(input, stage_output_size)
}

/// A render-ready composed clip: one sub-range of a source file plus the
/// transform plan that frames it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedClip {
    pub source: PathBuf,
    /// Sub-range start in seconds from the start of the source.
    pub start: f64,
    /// Sub-range length in seconds.
    pub duration: f64,
    /// Source frame rate (the renderer clamps the output rate).
    pub fps: f64,
    /// Whether the source sub-range carries an audio track to pass through.
    pub has_audio: bool,
    /// Foreground transform stages, applied in order.
    pub foreground: Vec<TransformStage>,
    /// Blurred background layer stages, when a fill layer is needed.
    pub background: Option<Vec<TransformStage>>,
    /// Output canvas, present exactly when a background layer exists.
    pub canvas: Option<(u32, u32)>,
}

impl ComposedClip {
    /// Whether the plan composites a background fill layer under the
    /// foreground.
    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }
}

/// Builds the render plan for one interval of a source video.
///
/// The foreground is cropped to the target aspect ratio only when the
/// source is relatively wider than the target (the crop narrows, never
/// pads), then scaled to the canvas width. Whether a blurred background
/// fill is needed depends on the shape of the (possibly cropped)
/// foreground:
///
/// - landscape or square: background is the original sub-range cropped to
///   1:1, blurred at 720x720, scaled to the square canvas;
/// - portrait but narrower than 9:16: background cropped to 9:16, blurred
///   at 720x1280, scaled to the full canvas;
/// - otherwise the foreground already fills a 9:16-ish portrait frame and
///   no background is added.
#[must_use]
pub fn compose_clip(
    source: &Path,
    props: &VideoProperties,
    start: f64,
    length: f64,
    config: &ProcessingConfig,
) -> ComposedClip {
    let (mut width, mut height) = (props.width, props.height);
    let mut foreground = Vec::new();

    let current_ratio = f64::from(width) / f64::from(height);
    let target_ratio = f64::from(config.target_ratio_w) / f64::from(config.target_ratio_h);
    if current_ratio > target_ratio {
        let rect = crop_rect(
            width,
            height,
            config.target_ratio_w,
            config.target_ratio_h,
            config.x_center,
            config.y_center,
        );
        width = rect.width;
        height = rect.height;
        foreground.push(TransformStage::Crop(rect));
    }

    let (bg_width, bg_height) = select_background_resolution(width);
    foreground.push(TransformStage::ScaleToWidth(bg_width));

    let (background, canvas) = if width >= height {
        let rect = crop_rect(props.width, props.height, 1, 1, config.x_center, config.y_center);
        let stages = vec![
            TransformStage::Crop(rect),
            TransformStage::Scale {
                width: BLUR_BASE_WIDTH,
                height: BLUR_BASE_WIDTH,
            },
            TransformStage::Blur { sigma: BLUR_SIGMA },
            TransformStage::Scale {
                width: bg_width,
                height: bg_width,
            },
        ];
        (Some(stages), Some((bg_width, bg_width)))
    } else if u64::from(width) * 16 < u64::from(height) * 9 {
        let rect = crop_rect(props.width, props.height, 9, 16, config.x_center, config.y_center);
        let stages = vec![
            TransformStage::Crop(rect),
            TransformStage::Scale {
                width: BLUR_BASE_WIDTH,
                height: BLUR_BASE_HEIGHT_PORTRAIT,
            },
            TransformStage::Blur { sigma: BLUR_SIGMA },
            TransformStage::Scale {
                width: bg_width,
                height: bg_height,
            },
        ];
        (Some(stages), Some((bg_width, bg_height)))
    } else {
        (None, None)
    };

    ComposedClip {
        source: source.to_path_buf(),
        start,
        duration: length,
        fps: props.fps,
        has_audio: props.has_audio,
        foreground,
        background,
        canvas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn props(width: u32, height: u32) -> VideoProperties {
        VideoProperties {
            width,
            height,
            duration_secs: 600.0,
            fps: 30.0,
            has_audio: true,
        }
    }

    fn config() -> ProcessingConfig {
        ProcessingConfig::new(PathBuf::from("/in"), PathBuf::from("/out"))
    }

    #[test]
    fn test_landscape_source_gets_square_background() {
        let clip = compose_clip(Path::new("a.mkv"), &props(1920, 1080), 10.0, 30.0, &config());

        // Foreground cropped to 1:1 then scaled to the canvas width
        assert_eq!(
            clip.foreground[0],
            TransformStage::Crop(crate::geometry::crop_rect(1920, 1080, 1, 1, 0.5, 0.5))
        );
        assert_eq!(clip.foreground[1], TransformStage::ScaleToWidth(1080));

        // Square canvas from the 1080-wide tier
        assert_eq!(clip.canvas, Some((1080, 1080)));

        let background = clip.background.expect("landscape needs a background fill");
        assert!(matches!(background[2], TransformStage::Blur { sigma } if sigma == BLUR_SIGMA));
        assert_eq!(
            background[3],
            TransformStage::Scale {
                width: 1080,
                height: 1080
            }
        );
    }

    #[test]
    fn test_narrow_portrait_gets_9_16_background() {
        let clip = compose_clip(Path::new("a.mkv"), &props(600, 1400), 0.0, 20.0, &config());

        // 600/1400 is below the 1:1 target ratio, so no foreground crop
        assert_eq!(clip.foreground, vec![TransformStage::ScaleToWidth(720)]);
        assert_eq!(clip.canvas, Some((720, 1280)));

        let background = clip.background.expect("narrow portrait needs a background fill");
        // Background is cut from the ORIGINAL frame, to 9:16
        assert_eq!(
            background[0],
            TransformStage::Crop(crate::geometry::crop_rect(600, 1400, 9, 16, 0.5, 0.5))
        );
        assert_eq!(
            background[1],
            TransformStage::Scale {
                width: 720,
                height: 1280
            }
        );
    }

    #[test]
    fn test_full_portrait_needs_no_background() {
        // Exactly 9:16 already fills the frame
        let clip = compose_clip(Path::new("a.mkv"), &props(1080, 1920), 0.0, 20.0, &config());
        assert!(!clip.has_background());
        assert_eq!(clip.canvas, None);
        assert_eq!(clip.foreground, vec![TransformStage::ScaleToWidth(1080)]);
    }

    #[test]
    fn test_audio_flag_passes_through() {
        let mut p = props(1920, 1080);
        p.has_audio = false;
        let clip = compose_clip(Path::new("a.mkv"), &p, 0.0, 10.0, &config());
        assert!(!clip.has_audio);
    }

    #[test]
    fn test_stage_output_size_tracking() {
        let stages = [
            TransformStage::Crop(CropRect {
                width: 1080,
                height: 1080,
                x: 420,
                y: 0,
            }),
            TransformStage::ScaleToWidth(900),
            TransformStage::Blur { sigma: 8.0 },
        ];
        assert_eq!(stages_output_size((1920, 1080), &stages), (900, 900));
    }
}
