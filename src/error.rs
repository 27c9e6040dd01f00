use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run. Anything that goes wrong with a single file is
/// handled by skipping that file and never shows up here.
#[derive(Debug, Error)]
pub enum ClocError {
    #[error("language registry is empty or inconsistent: {0}")]
    EmptyRegistry(String),

    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Invalid filespec pattern '{pattern}': {source}")]
    InvalidFilespec {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid directory pattern '{pattern}': {source}")]
    InvalidMatchDir {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClocError>;
