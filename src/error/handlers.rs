//! Error handlers
//!
//! Converts file manager errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{Level, log};
use serde::Serialize;
use std::error::Error as _;

use crate::error::types::FileManagerError;

/// Body of an aggregate batch failure
#[derive(Debug, Serialize)]
pub struct BatchErrorBody {
    pub message: String,
    pub errors: Vec<String>,
}

/// Convert error to HTTP status code
pub fn error_to_status_code(err: &FileManagerError) -> StatusCode {
    match err {
        FileManagerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        FileManagerError::InvalidEncoding(_) => StatusCode::BAD_REQUEST,
        FileManagerError::PathEscape(_) => StatusCode::FORBIDDEN,
        FileManagerError::NotFound(_) => StatusCode::NOT_FOUND,
        FileManagerError::Conflict(_) => StatusCode::CONFLICT,
        FileManagerError::Access { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        FileManagerError::Batch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a file manager error together with its underlying cause.
///
/// Server-side failures are logged as errors, rejected client input as warnings.
pub fn handle_error(err: &FileManagerError) {
    let level = if error_to_status_code(err).is_server_error() {
        Level::Error
    } else {
        Level::Warn
    };

    match err.source() {
        Some(source) => log!(level, "{err}: {source}"),
        None => log!(level, "{err}"),
    }
}

impl IntoResponse for FileManagerError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        // Batch items are logged one by one as they fail
        if !matches!(self, FileManagerError::Batch { .. }) {
            handle_error(&self);
        }

        match self {
            FileManagerError::Batch { message, errors } => {
                (status, Json(BatchErrorBody { message, errors })).into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (FileManagerError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (FileManagerError::InvalidEncoding("%zz".into()), StatusCode::BAD_REQUEST),
            (FileManagerError::PathEscape("../x".into()), StatusCode::FORBIDDEN),
            (FileManagerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (FileManagerError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                FileManagerError::access("Failed to write file", "x", io::Error::other("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(error_to_status_code(&err), expected, "{err}");
        }
    }

    #[test]
    fn access_message_hides_io_details() {
        let err = FileManagerError::access(
            "Failed to write file",
            "Maps/a.txt",
            io::Error::other("/srv/UserData/Maps/a.txt: disk full"),
        );
        assert_eq!(err.to_string(), "Failed to write file: Maps/a.txt");
    }

    #[test]
    fn batch_error_renders_as_server_error() {
        let response = FileManagerError::Batch {
            message: "Some files could not be uploaded".into(),
            errors: vec!["Invalid file path: a.txt".into()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
