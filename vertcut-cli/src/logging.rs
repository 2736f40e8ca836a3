// vertcut-cli/src/logging.rs
//
// Console + file logging setup. Messages go to stdout bare (the scene
// diagnostics are meant to be read as a report) and to a timestamped
// per-run log file with level and time prefixes.

use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS",
/// used for unique run log filenames.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Initializes logging. Returns the path of the run log file.
pub fn init(log_dir: &Path, verbose: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let log_path = log_dir.join(format!("vertcut_run_{}.log", get_timestamp()));

    fern::Dispatch::new()
        .level(level)
        .chain(
            fern::Dispatch::new()
                .format(|out, message, _record| out.finish(format_args!("{message}")))
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        message
                    ))
                })
                .chain(fern::log_file(&log_path)?),
        )
        .apply()?;

    Ok(log_path)
}
