// vertcut-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vertcut: gameplay shorts generator",
    long_about = "Cuts long gameplay recordings into vertically-framed highlight \
                  clips using scene detection and ffmpeg via the vertcut-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed logging output
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates shorts from an input file or directory of recordings
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Input video file or directory containing recordings
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Directory where rendered shorts will be saved
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    // --- Framing ---
    /// Target aspect ratio as W:H (e.g. 1:1 or 9:16)
    #[arg(long, value_name = "W:H", value_parser = parse_ratio, default_value = "1:1")]
    pub ratio: (u32, u32),

    /// Horizontal centre of interest as a fraction of width [0, 1]
    #[arg(long, value_name = "FRACTION", default_value_t = 0.5)]
    pub x_center: f64,

    /// Vertical centre of interest as a fraction of height [0, 1]
    #[arg(long, value_name = "FRACTION", default_value_t = 0.5)]
    pub y_center: f64,

    // --- Scene Selection ---
    /// Scene-change detection sensitivity
    #[arg(long, value_name = "THRESHOLD", default_value_t = vertcut_core::config::DEFAULT_DETECTION_THRESHOLD)]
    pub threshold: f32,

    /// Maximum number of shorts rendered per source video
    #[arg(long, value_name = "COUNT", default_value_t = vertcut_core::config::DEFAULT_SCENE_LIMIT)]
    pub scene_limit: usize,

    /// Minimum short length in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = vertcut_core::config::DEFAULT_MIN_SHORT_LENGTH)]
    pub min_length: f64,

    /// Maximum short length in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = vertcut_core::config::DEFAULT_MAX_SHORT_LENGTH)]
    pub max_length: f64,

    /// Cap on a merged run of short scenes, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = vertcut_core::config::DEFAULT_MAX_COMBINED_SCENE_LENGTH)]
    pub max_combined: f64,

    // --- Rendering ---
    /// Number of render retries after the first failed attempt
    #[arg(long, value_name = "COUNT", default_value_t = vertcut_core::config::DEFAULT_MAX_RETRY_DEPTH)]
    pub retries: u32,

    /// Return an error when a clip still fails after the last retry,
    /// instead of logging and continuing
    #[arg(long, default_value_t = false)]
    pub propagate_failures: bool,

    /// Seed for the randomized start-point selection (reproducible runs)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Parses a "W:H" aspect ratio argument.
fn parse_ratio(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected W:H, got '{raw}'"))?;
    let w: u32 = w.parse().map_err(|_| format!("invalid ratio width '{w}'"))?;
    let h: u32 = h.parse().map_err(|_| format!("invalid ratio height '{h}'"))?;
    if w == 0 || h == 0 {
        return Err("ratio components must be positive".to_string());
    }
    Ok((w, h))
}
