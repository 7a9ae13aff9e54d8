//! Error types
//!
//! Defines the error taxonomy shared by path resolution, listing and file operations.
//! Messages only ever carry client-relative paths; underlying I/O errors are kept as
//! sources for server-side logging.

use std::io;
use thiserror::Error;

/// Path resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid path encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid path: {0}")]
    Escape(String),
}

/// Errors surfaced by every file manager operation
#[derive(Debug, Error)]
pub enum FileManagerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid path encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid path: {0}")]
    PathEscape(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Item already exists: {0}")]
    Conflict(String),

    #[error("{action}: {path}")]
    Access {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    Batch {
        message: String,
        errors: Vec<String>,
    },
}

impl FileManagerError {
    pub fn access(action: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        FileManagerError::Access {
            action,
            path: path.into(),
            source,
        }
    }

    /// Map a filesystem error on `path`, keeping `NotFound` distinct from other failures.
    pub fn from_io(action: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => FileManagerError::NotFound(path),
            _ => FileManagerError::access(action, path, source),
        }
    }
}

impl From<PathError> for FileManagerError {
    fn from(error: PathError) -> Self {
        match error {
            PathError::InvalidEncoding(p) => FileManagerError::InvalidEncoding(p),
            PathError::Escape(p) => FileManagerError::PathEscape(p),
        }
    }
}
