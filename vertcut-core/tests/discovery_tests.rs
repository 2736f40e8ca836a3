// vertcut-core/tests/discovery_tests.rs

use std::fs::{self, File};
use std::path::PathBuf;

use tempfile::tempdir;

use vertcut_core::discovery::find_processable_files;
use vertcut_core::error::CoreError;

#[test]
fn test_find_processable_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("match1.mkv"))?;
    File::create(input_dir.join("match2.MP4"))?; // Case insensitivity
    File::create(input_dir.join("clip.webm"))?;
    File::create(input_dir.join("notes.txt"))?;
    File::create(input_dir.join("thumb.jpg"))?;
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested.mkv"))?; // Not found (top level only)

    let files = find_processable_files(input_dir)?;

    assert_eq!(files.len(), 3);
    // Results are sorted for deterministic processing order
    assert_eq!(files[0].file_name().unwrap(), "clip.webm");
    assert_eq!(files[1].file_name().unwrap(), "match1.mkv");
    assert_eq!(files[2].file_name().unwrap(), "match2.MP4");

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("document.txt"))?;
    fs::create_dir(input_dir.join("subdir"))?;

    let result = find_processable_files(input_dir);
    assert!(matches!(result, Err(CoreError::NoFilesFound)));

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_nonexistent_dir() {
    let non_existent_path = PathBuf::from("surely_this_does_not_exist_42_integration");
    let result = find_processable_files(&non_existent_path);
    assert!(matches!(result, Err(CoreError::Io(_))));
}
