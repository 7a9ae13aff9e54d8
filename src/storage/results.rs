//! Storage result types
//!
//! Defines the records produced and consumed by storage operations.

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::Metadata;

use crate::error::FileManagerError;

/// One filesystem node as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    /// Client-facing path rooted at `/UserData`
    pub path: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

fn is_zero(size: &u64) -> bool {
    *size == 0
}

impl FileEntry {
    /// Directories report no size and no modification time.
    pub fn from_metadata(name: impl Into<String>, path: impl Into<String>, metadata: &Metadata) -> Self {
        let is_dir = metadata.is_dir();
        let (size, last_modified) = if is_dir {
            (0, None)
        } else {
            (
                metadata.len(),
                metadata.modified().ok().map(DateTime::<Utc>::from),
            )
        };

        Self {
            name: name.into(),
            path: path.into(),
            is_dir,
            size,
            last_modified,
        }
    }
}

/// Body of `POST /create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub content: Option<String>,
}

impl CreateItemRequest {
    pub fn validate(&self) -> Result<(), FileManagerError> {
        if self.path.trim().is_empty() {
            return Err(FileManagerError::BadRequest("No path provided".into()));
        }
        Ok(())
    }
}

/// A file part received in an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client
    pub file_name: String,
    /// Part body as received, shared with the request buffer
    pub data: Bytes,
}

/// Outcome of a batch operation: successes plus one message per failed item
#[derive(Debug)]
pub struct BatchReport<T> {
    pub results: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn record(&mut self, outcome: Result<T, FileManagerError>) {
        match outcome {
            Ok(item) => self.results.push(item),
            Err(e) => self.errors.push(e.to_string()),
        }
    }

    /// Fail with an aggregate error if any item failed.
    pub fn into_result(self, message: &str) -> Result<Vec<T>, FileManagerError> {
        if self.errors.is_empty() {
            Ok(self.results)
        } else {
            Err(FileManagerError::Batch {
                message: message.to_string(),
                errors: self.errors,
            })
        }
    }
}
