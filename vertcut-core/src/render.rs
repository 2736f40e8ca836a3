//! Render supervision: encoding a composed clip with bounded retry.
//!
//! Any error raised by the encode step is treated as transient and retried
//! up to `max_retry_depth` additional times. The retry is an explicit loop
//! with an attempt counter, so the bound is trivially testable and the
//! stack stays flat.

use std::path::Path;

use crate::compose::ComposedClip;
use crate::config::{ProcessingConfig, RenderFailurePolicy};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::{build_render_command, run_render};
use crate::external::ffmpeg_executor::FfmpegSpawner;

/// What happened to one clip's render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Total encode attempts made, including the successful one if any.
    pub attempts: u32,
    /// Whether an attempt eventually succeeded.
    pub succeeded: bool,
}

/// Renders a composed clip to `destination`, retrying on failure.
///
/// Makes at most `max_retry_depth + 1` attempts. When every attempt fails,
/// the configured failure policy decides whether the exhausted error is
/// swallowed (logged, `succeeded == false`) or propagated to the caller.
pub fn render_clip<S: FfmpegSpawner>(
    spawner: &S,
    clip: &ComposedClip,
    destination: &Path,
    config: &ProcessingConfig,
) -> CoreResult<RenderOutcome> {
    let max_attempts = config.max_retry_depth + 1;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let cmd = build_render_command(clip, destination);
        match run_render(spawner, cmd) {
            Ok(()) => {
                log::info!(
                    "Rendered {} (attempt {attempt}/{max_attempts})",
                    destination.display()
                );
                return Ok(RenderOutcome {
                    attempts: attempt,
                    succeeded: true,
                });
            }
            Err(e) if attempt < max_attempts => {
                log::warn!("Rendering failed, retrying (attempt {attempt}/{max_attempts}): {e}");
            }
            Err(e) => {
                log::error!(
                    "Rendering failed after {attempt} attempt(s) for {}: {e}",
                    destination.display()
                );
                return match config.failure_policy {
                    RenderFailurePolicy::SwallowAndLog => Ok(RenderOutcome {
                        attempts: attempt,
                        succeeded: false,
                    }),
                    RenderFailurePolicy::Propagate => Err(CoreError::RenderExhausted {
                        path: destination.display().to_string(),
                        attempts: attempt,
                    }),
                };
            }
        }
    }
}
