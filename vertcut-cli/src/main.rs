// vertcut-cli/src/main.rs
//
// Command-line entry point for the Vertcut shorts generator.
//
// Responsibilities:
// - Parsing user-provided arguments (see cli.rs).
// - Setting up logging to console and a per-run log file.
// - Validating input paths and identifying files to process.
// - Configuring vertcut-core and invoking the processing pipeline.
// - Displaying a summary of results and managing the process exit code.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser;

use vertcut_core::external::{
    CrateFfprobeExecutor, ScdetSceneDetector, SidecarSpawner, check_dependency,
};
use vertcut_core::{
    CoreError, ProcessingConfig, RenderFailurePolicy, find_processable_files, format_duration,
    process_videos,
};

mod cli;
mod logging;

use cli::{Cli, Commands, GenerateArgs};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_generate(args: GenerateArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let total_start_time = Instant::now();

    // --- Determine paths ---
    let input_path = args
        .input_path
        .canonicalize()
        .map_err(|e| format!("Invalid input path '{}': {e}", args.input_path.display()))?;
    let output_dir = args.output_dir.clone();
    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| output_dir.join("logs"));

    fs::create_dir_all(&output_dir)?;
    fs::create_dir_all(&log_dir)?;

    let log_path = logging::init(&log_dir, verbose)?;

    // --- Validate input and determine files to process ---
    let metadata = fs::metadata(&input_path)
        .map_err(|e| format!("Failed to access input path '{}': {e}", input_path.display()))?;

    let (files_to_process, effective_input_dir) = if metadata.is_dir() {
        // An empty input directory is an input error and fails fast,
        // before any rendering work begins.
        let files = find_processable_files(&input_path)?;
        (files, input_path.clone())
    } else if metadata.is_file() {
        if !vertcut_core::discovery::is_valid_video_file(&input_path) {
            return Err(format!(
                "Input file '{}' is not a supported video container.",
                input_path.display()
            )
            .into());
        }
        let parent_dir = input_path
            .parent()
            .ok_or_else(|| {
                CoreError::PathError(format!(
                    "Could not determine parent directory for '{}'",
                    input_path.display()
                ))
            })?
            .to_path_buf();
        (vec![input_path.clone()], parent_dir)
    } else {
        return Err(format!(
            "Input path '{}' is neither a file nor a directory.",
            input_path.display()
        )
        .into());
    };

    log::info!("========================================");
    log::info!("Vertcut Run Started: {}", chrono::Local::now());
    log::info!("Input path: {}", input_path.display());
    log::info!("Output directory: {}", output_dir.display());
    log::info!("Run log file: {}", log_path.display());
    log::info!("========================================");

    // --- Prepare core configuration ---
    let mut config = ProcessingConfig::new(effective_input_dir, output_dir);
    config.target_ratio_w = args.ratio.0;
    config.target_ratio_h = args.ratio.1;
    config.x_center = args.x_center;
    config.y_center = args.y_center;
    config.detection_threshold = args.threshold;
    config.scene_limit = args.scene_limit;
    config.min_short_length = args.min_length;
    config.max_short_length = args.max_length;
    config.max_combined_scene_length = args.max_combined;
    config.max_retry_depth = args.retries;
    config.failure_policy = if args.propagate_failures {
        RenderFailurePolicy::Propagate
    } else {
        RenderFailurePolicy::SwallowAndLog
    };
    config.seed = args.seed;
    config.validate()?;

    // --- Check external dependencies ---
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    log::info!("Found {} file(s) to process.", files_to_process.len());

    // --- Execute core logic ---
    let reports = process_videos(
        &SidecarSpawner,
        &CrateFfprobeExecutor::new(),
        &ScdetSceneDetector::new(),
        &config,
        &files_to_process,
    )?;

    // --- Print summary ---
    let total_rendered: usize = reports.iter().map(|r| r.shorts_rendered).sum();
    let total_failed: usize = reports.iter().map(|r| r.shorts_failed).sum();

    log::info!("========================================");
    log::info!("Shorts Summary:");
    log::info!("========================================");
    for report in &reports {
        log::info!("{}", report.filename);
        log::info!("  Shorts rendered: {}", report.shorts_rendered);
        log::info!("  Shorts failed:   {}", report.shorts_failed);
        log::info!("  Processing time: {}", format_duration(report.elapsed));
        log::info!("----------------------------------------");
    }
    if total_rendered > 0 {
        log::info!("Successfully rendered {total_rendered} short(s).");
    } else {
        log::info!("No shorts were successfully rendered.");
    }
    if total_failed > 0 {
        log::warn!("{total_failed} short(s) failed after exhausting retries.");
    }

    log::info!(
        "Total execution time: {}",
        format_duration(total_start_time.elapsed())
    );
    log::info!("Vertcut Run Finished: {}", chrono::Local::now());
    log::info!("========================================");

    Ok(())
}
