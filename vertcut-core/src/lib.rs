//! Core library for turning long gameplay recordings into short,
//! vertically-framed highlight clips.
//!
//! This crate provides video file discovery, scene boundary consumption,
//! scene merging and ranking, aspect-ratio-aware clip composition (with a
//! blurred background fill when needed), and resilient rendering through
//! ffmpeg.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use vertcut_core::{ProcessingConfig, process_videos};
//! use vertcut_core::external::{CrateFfprobeExecutor, ScdetSceneDetector, SidecarSpawner};
//!
//! let config = ProcessingConfig::new(
//!     PathBuf::from("/path/to/gameplay"),
//!     PathBuf::from("/path/to/generated"),
//! );
//! config.validate().unwrap();
//!
//! let files = vertcut_core::find_processable_files(&config.input_dir).unwrap();
//! let reports = process_videos(
//!     &SidecarSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &ScdetSceneDetector::new(),
//!     &config,
//!     &files,
//! ).unwrap();
//! ```

pub mod compose;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod frame;
pub mod geometry;
pub mod processing;
pub mod render;
pub mod scenes;
pub mod utils;

// Re-exports for public API
pub use compose::{ComposedClip, TransformStage, compose_clip};
pub use config::{ProcessingConfig, RenderFailurePolicy};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use processing::{ProcessReport, process_videos};
pub use render::{RenderOutcome, render_clip};
pub use scenes::{RankingStrategy, SceneInterval, TimePoint, combine_scenes, rank_scenes};
pub use utils::{format_duration, format_timecode};
