//! Configuration structures and default constants for vertcut-core.
//!
//! A `ProcessingConfig` is created once per run by the consumer of the
//! library (vertcut-cli) and passed down into `process_videos`. It is never
//! mutated after construction; everything the pipeline can be tuned with
//! lives here.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

// ---- Default constants (tuned for gameplay captures) ----

/// Default scene-change sensitivity passed to the detector.
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 27.0;

/// Default cap on how many merged scenes are rendered per source video.
pub const DEFAULT_SCENE_LIMIT: usize = 6;

/// Default minimum length of a rendered short, in seconds.
pub const DEFAULT_MIN_SHORT_LENGTH: f64 = 15.0;

/// Default maximum length of a rendered short, in seconds.
pub const DEFAULT_MAX_SHORT_LENGTH: f64 = 179.0;

/// Default cap on the length of a merged run of short scenes, in seconds.
pub const DEFAULT_MAX_COMBINED_SCENE_LENGTH: f64 = 300.0;

/// Default number of render retries after the first failed attempt.
pub const DEFAULT_MAX_RETRY_DEPTH: u32 = 3;

/// What to do when a clip still fails after the last render retry.
///
/// The original behaviour is to log the failure and move on to the next
/// clip; `Propagate` surfaces the error to the caller instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFailurePolicy {
    /// Log the exhausted failure and continue with sibling clips/files.
    #[default]
    SwallowAndLog,
    /// Return the exhausted failure to the caller.
    Propagate,
}

/// Main configuration structure for the vertcut-core library.
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    // ---- Path Configuration ----
    /// Directory containing input video files to process
    pub input_dir: PathBuf,

    /// Directory where rendered shorts will be saved
    pub output_dir: PathBuf,

    // ---- Framing ----
    /// Target aspect ratio width component (positive)
    pub target_ratio_w: u32,

    /// Target aspect ratio height component (positive)
    pub target_ratio_h: u32,

    /// Horizontal centre of interest as a fraction of source width [0, 1]
    pub x_center: f64,

    /// Vertical centre of interest as a fraction of source height [0, 1]
    pub y_center: f64,

    // ---- Scene Selection ----
    /// Scene-change sensitivity handed to the detector
    pub detection_threshold: f32,

    /// Maximum number of merged scenes rendered per source video
    pub scene_limit: usize,

    /// Minimum length of a rendered short, seconds
    pub min_short_length: f64,

    /// Maximum length of a rendered short, seconds
    pub max_short_length: f64,

    /// Cap on the length of a merged run of short scenes, seconds
    pub max_combined_scene_length: f64,

    // ---- Rendering ----
    /// Number of retries after the first failed render attempt
    pub max_retry_depth: u32,

    /// Behaviour once retries are exhausted
    pub failure_policy: RenderFailurePolicy,

    /// Optional RNG seed for reproducible start-point selection
    pub seed: Option<u64>,
}

impl ProcessingConfig {
    /// Creates a configuration with library defaults for the given directories.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            target_ratio_w: 1,
            target_ratio_h: 1,
            x_center: 0.5,
            y_center: 0.5,
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            scene_limit: DEFAULT_SCENE_LIMIT,
            min_short_length: DEFAULT_MIN_SHORT_LENGTH,
            max_short_length: DEFAULT_MAX_SHORT_LENGTH,
            max_combined_scene_length: DEFAULT_MAX_COMBINED_SCENE_LENGTH,
            max_retry_depth: DEFAULT_MAX_RETRY_DEPTH,
            failure_policy: RenderFailurePolicy::default(),
            seed: None,
        }
    }

    /// The midpoint between the minimum and maximum short lengths.
    ///
    /// Merged scene runs shorter than this are discarded by the merger.
    #[must_use]
    pub fn middle_short_length(&self) -> f64 {
        (self.min_short_length + self.max_short_length) / 2.0
    }

    /// Validates the configuration, failing fast before any rendering work.
    pub fn validate(&self) -> CoreResult<()> {
        if self.target_ratio_w == 0 || self.target_ratio_h == 0 {
            return Err(CoreError::Config(format!(
                "Target aspect ratio components must be positive, got {}:{}",
                self.target_ratio_w, self.target_ratio_h
            )));
        }
        if self.scene_limit == 0 {
            return Err(CoreError::Config(
                "Scene limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.x_center) || !(0.0..=1.0).contains(&self.y_center) {
            return Err(CoreError::Config(format!(
                "Crop centre must be within [0, 1], got ({}, {})",
                self.x_center, self.y_center
            )));
        }
        if self.min_short_length <= 0.0 {
            return Err(CoreError::Config(format!(
                "Minimum short length must be positive, got {}",
                self.min_short_length
            )));
        }
        if self.min_short_length > self.max_short_length {
            return Err(CoreError::Config(format!(
                "Minimum short length ({}) exceeds maximum ({})",
                self.min_short_length, self.max_short_length
            )));
        }
        if self.detection_threshold <= 0.0 {
            return Err(CoreError::Config(format!(
                "Detection threshold must be positive, got {}",
                self.detection_threshold
            )));
        }
        if self.max_combined_scene_length < self.max_short_length {
            // Recommended ordering only; the merge stays well defined.
            log::warn!(
                "max_combined_scene_length ({}) is below max_short_length ({})",
                self.max_combined_scene_length,
                self.max_short_length
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ProcessingConfig {
        ProcessingConfig::new(PathBuf::from("/in"), PathBuf::from("/out"))
    }

    #[test]
    fn test_defaults_validate() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_middle_short_length() {
        let mut config = valid_config();
        config.min_short_length = 5.0;
        config.max_short_length = 10.0;
        assert_eq!(config.middle_short_length(), 7.5);
    }

    #[test]
    fn test_zero_ratio_rejected() {
        let mut config = valid_config();
        config.target_ratio_h = 0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_min_above_max_rejected() {
        let mut config = valid_config();
        config.min_short_length = 30.0;
        config.max_short_length = 20.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_center_out_of_range_rejected() {
        let mut config = valid_config();
        config.x_center = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_scene_limit_rejected() {
        let mut config = valid_config();
        config.scene_limit = 0;
        assert!(config.validate().is_err());
    }
}
