//! Error types for the variable library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for variable library operations.
#[derive(Debug, Error)]
pub enum VarLibError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Workspace resolution errors
    #[error("Workspace error: {message}")]
    Workspace { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for variable library operations.
pub type Result<T> = std::result::Result<T, VarLibError>;

impl From<std::io::Error> for VarLibError {
    fn from(err: std::io::Error) -> Self {
        VarLibError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl VarLibError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        VarLibError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}
