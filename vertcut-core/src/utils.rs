//! Utility functions for formatting and path handling.
//!
//! General-purpose helpers used throughout the vertcut-core library:
//! duration and timecode formatting plus safe filename extraction.

use std::path::Path;
use std::time::Duration;

/// Formats an elapsed wall-clock duration as HH:MM:SS for run summaries.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats a position on the video timeline as HH:MM:SS.mmm.
/// Returns "??:??:??.???" for negative or non-finite inputs.
#[must_use]
pub fn format_timecode(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??.???".to_string();
    }

    let whole = seconds as u64;
    let millis = ((seconds - whole as f64) * 1000.0).round() as u64;
    // Rounding can carry into the next second (e.g. 4.9996).
    let (whole, millis) = if millis >= 1000 {
        (whole + 1, 0)
    } else {
        (whole, millis)
    };
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Safely extracts the filename from a path with consistent error handling.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}
