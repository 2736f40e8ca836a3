//! File discovery module for finding video files to process.
//!
//! Scans the top level of the input directory for common video container
//! extensions (case-insensitive). Subdirectories are not searched.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Container extensions accepted as processable gameplay recordings.
const VIDEO_EXTENSIONS: [&str; 4] = ["mkv", "mp4", "mov", "webm"];

/// Checks if the given path looks like a processable video file.
#[must_use]
pub fn is_valid_video_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext_str| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|valid| ext_str.eq_ignore_ascii_case(valid))
            })
            .unwrap_or(false)
}

/// Finds video files eligible for processing in the specified directory.
///
/// Returns the matching paths sorted by filename for deterministic
/// processing order, or `CoreError::NoFilesFound` when the directory holds
/// no processable videos.
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            is_valid_video_file(&path).then_some(path)
        })
        .collect();

    files.sort();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        Ok(files)
    }
}
