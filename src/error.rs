//! Error types for the gdrive_wrap crate.

use thiserror::Error;

/// Errors that can occur when driving the external `gdrive` tool.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Path not found: '{segment}' does not exist under '{prefix}'")]
    PathNotFound { segment: String, prefix: String },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Not a sync root: {0}")]
    NotASyncRoot(String),

    #[error("Unsupported output format for command: {0}")]
    UnsupportedFormat(String),

    #[error("External tool failed: {command}\n{output}")]
    ExternalToolFailure { command: String, output: String },

    #[error("Invalid path, URL or ID: {0}")]
    InvalidLocation(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParse(#[from] serde_json::Error),

    #[error("No files matched pattern: {0}")]
    NoFilesMatched(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl DriveError {
    pub(crate) fn path_not_found(segment: impl Into<String>, prefix: impl Into<String>) -> Self {
        DriveError::PathNotFound {
            segment: segment.into(),
            prefix: prefix.into(),
        }
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
