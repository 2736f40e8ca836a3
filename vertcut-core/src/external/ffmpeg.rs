//! FFmpeg command building and execution for rendering shorts.
//!
//! Lowers a `ComposedClip` transform plan to an ffmpeg invocation: the
//! foreground stages become a `-vf` chain, and when a background fill layer
//! is present the source is split into two chains composited with overlay
//! in a filter graph. The blur runs inside ffmpeg frame by frame, so memory
//! stays bounded regardless of clip length.

use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use crate::compose::{ComposedClip, TransformStage};
use crate::error::{CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};

/// Output frame rates are capped here regardless of the source.
pub const MAX_OUTPUT_FPS: f64 = 60.0;

/// The ffmpeg filter expression for one transform stage.
fn stage_filter(stage: &TransformStage) -> String {
    match *stage {
        TransformStage::Crop(rect) => {
            format!("crop={}:{}:{}:{}", rect.width, rect.height, rect.x, rect.y)
        }
        TransformStage::Scale { width, height } => format!("scale={width}:{height}"),
        TransformStage::ScaleToWidth(width) => format!("scale={width}:-2"),
        TransformStage::Blur { sigma } => format!("gblur=sigma={sigma}"),
    }
}

/// Joins a stage sequence into a single filter chain.
fn filter_chain(stages: &[TransformStage]) -> String {
    stages
        .iter()
        .map(stage_filter)
        .collect::<Vec<_>>()
        .join(",")
}

/// The complete filter graph for a two-layer composition.
///
/// The decoded sub-range is split into a foreground and a background
/// branch; the blurred background is laid down first and the foreground is
/// overlaid centred on top.
fn composite_graph(clip: &ComposedClip, background: &[TransformStage]) -> String {
    format!(
        "[0:v]split=2[fgsrc][bgsrc];\
         [fgsrc]{fg}[fg];\
         [bgsrc]{bg}[bg];\
         [bg][fg]overlay=(W-w)/2:(H-h)/2[vout]",
        fg = filter_chain(&clip.foreground),
        bg = filter_chain(background),
    )
}

/// Builds the ffmpeg command that renders a composed clip to `destination`.
#[must_use]
pub fn build_render_command(clip: &ComposedClip, destination: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.arg("-hide_banner")
        .arg("-y")
        .args(["-ss", &format!("{:.3}", clip.start)])
        .args(["-t", &format!("{:.3}", clip.duration)])
        .input(clip.source.to_string_lossy().as_ref());

    match &clip.background {
        Some(background) => {
            cmd.args(["-filter_complex", &composite_graph(clip, background)])
                .args(["-map", "[vout]"]);
            if clip.has_audio {
                cmd.args(["-map", "0:a:0"]);
            }
        }
        None => {
            cmd.args(["-vf", &filter_chain(&clip.foreground)])
                .args(["-map", "0:v:0"]);
            if clip.has_audio {
                cmd.args(["-map", "0:a:0"]);
            }
        }
    }

    cmd.args(["-c:v", "libx264"]);
    if clip.has_audio {
        cmd.args(["-c:a", "aac"]);
    } else {
        cmd.arg("-an");
    }

    let fps = clip.fps.min(MAX_OUTPUT_FPS);
    if fps > 0.0 {
        cmd.args(["-r", &format!("{fps}")]);
    }
    cmd.args(["-movflags", "+faststart"]);
    cmd.output(destination.to_string_lossy().as_ref());
    cmd
}

/// Runs a render command to completion, collecting diagnostics.
pub fn run_render<S: FfmpegSpawner>(spawner: &S, cmd: FfmpegCommand) -> CoreResult<()> {
    log::debug!("Running render command: {cmd:?}");

    let mut child = spawner.spawn(cmd)?;
    let mut stderr_buffer = String::new();
    child.handle_events(|event| {
        match event {
            FfmpegEvent::Progress(progress) => {
                log::debug!("Render progress: time={} speed={}x", progress.time, progress.speed);
            }
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                stderr_buffer.push_str(&line);
                stderr_buffer.push('\n');
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(command_failed_error(
            "ffmpeg (render)",
            status,
            stderr_buffer.trim(),
        ))
    }
}

/// Extracts a single frame from the source at `at_seconds`, written as an
/// image to `destination`. Used for poster thumbnails.
pub fn extract_poster_frame<S: FfmpegSpawner>(
    spawner: &S,
    source: &Path,
    at_seconds: f64,
    destination: &Path,
) -> CoreResult<()> {
    let mut cmd = FfmpegCommand::new();
    cmd.arg("-hide_banner")
        .arg("-y")
        .args(["-ss", &format!("{at_seconds:.3}")])
        .input(source.to_string_lossy().as_ref())
        .args(["-frames:v", "1"])
        .output(destination.to_string_lossy().as_ref());

    log::debug!("Running poster extraction command: {cmd:?}");

    let mut child = spawner.spawn(cmd)?;
    child.handle_events(|_| Ok(()))?;
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(command_failed_error(
            "ffmpeg (poster frame)",
            status,
            "Poster frame extraction failed",
        ))
    }
}
