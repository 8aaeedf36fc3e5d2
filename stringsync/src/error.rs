//! All error types for the stringsync crate.
//!
//! These are returned from every fallible storage, codec and configuration operation.
//! Parsing of `.strings` text and grids never fails on malformed content; bad lines are
//! dropped instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("directory {} not found or it is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("malformed config `{}`: {message}", path.display())]
    MalformedConfig { path: PathBuf, message: String },

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("sheet `{0}` not found")]
    SheetNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new malformed config error for the file at `path`.
    pub fn malformed_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::MalformedConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Error::Unsupported(operation.into())
    }
}
