use std::process::ExitStatus;

use thiserror::Error;

/// Custom error types for vertcut
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start {tool}: {message}")]
    CommandStart { tool: String, message: String },

    #[error("{tool} failed ({status}): {message}")]
    CommandFailed {
        tool: String,
        status: String,
        message: String,
    },

    #[error("Failed waiting for {tool}: {message}")]
    CommandWait { tool: String, message: String },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("Video info error: {0}")]
    VideoInfoError(String),

    #[error("Scene detection failed: {0}")]
    SceneDetection(String),

    #[error("Rendering failed after {attempts} attempt(s) for {path}")]
    RenderExhausted { path: String, attempts: u32 },

    #[error("No processable video files found in input directory")]
    NoFilesFound,

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for vertcut operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error from whatever error type the spawn path produced.
pub fn command_start_error(tool: impl Into<String>, err: impl std::fmt::Display) -> CoreError {
    CoreError::CommandStart {
        tool: tool.into(),
        message: err.to_string(),
    }
}

/// Builds a `CommandFailed` error carrying the process exit status.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    message: impl std::fmt::Display,
) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.into(),
        status: status
            .code()
            .map_or_else(|| "terminated".to_string(), |c| c.to_string()),
        message: message.to_string(),
    }
}

/// Builds a `CommandWait` error from a wait() failure.
pub fn command_wait_error(tool: impl Into<String>, err: impl std::fmt::Display) -> CoreError {
    CoreError::CommandWait {
        tool: tool.into(),
        message: err.to_string(),
    }
}
