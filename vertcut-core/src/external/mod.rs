//! Interactions with external CLI tools.
//!
//! Encapsulates everything that shells out: ffprobe media analysis, ffmpeg
//! scene detection, and ffmpeg rendering. Each concern sits behind a trait
//! so the processing pipeline can be driven by mocks in tests; the default
//! implementations use the `ffprobe` and `ffmpeg-sidecar` crates.

use std::io;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult, command_start_error};

/// Scene boundary detection via ffmpeg's scdet filter
pub mod detector;

/// Render/poster command building and execution
pub mod ffmpeg;

/// Traits and implementations for spawning ffmpeg processes
pub mod ffmpeg_executor;

/// Traits and implementations for probing media files
pub mod ffprobe_executor;

/// Mock implementations for tests (behind the `test-mocks` feature)
pub mod mocks;

pub use detector::{ScdetSceneDetector, SceneDetector};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, ProbeExecutor, VideoProperties};

/// Checks that a required external command is available and executable.
///
/// Runs `<cmd> -version` and discards the output; only the ability to start
/// the process matters.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}
