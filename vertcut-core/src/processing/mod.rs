//! Processing orchestration.
//!
//! Contains the main entry point that drives scene detection, merging,
//! ranking, composition and rendering for each source video.

pub mod video;

pub use video::{ProcessReport, process_videos};
