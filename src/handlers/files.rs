//! Upload, delete, create and save-text handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::Uri;
use log::debug;

use crate::error::FileManagerError;
use crate::server::AppState;
use crate::storage::operations;
use crate::storage::{CreateItemRequest, FileEntry, UploadedFile};

const FILES_FIELD: &str = "files";
const PATHS_FIELD: &str = "paths[]";

/// `POST /upload`: repeated `files` parts paired by position with repeated `paths[]` fields
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<FileEntry>>, FileManagerError> {
    let mut files = Vec::new();
    let mut paths = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILES_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let data = field.bytes().await.map_err(invalid_form)?;
                files.push(UploadedFile { file_name, data });
            }
            Some(PATHS_FIELD) => paths.push(field.text().await.map_err(invalid_form)?),
            other => debug!("Ignoring upload form field {:?}", other),
        }
    }

    let entries = operations::upload_files(&state.resolver, files, paths).await?;
    Ok(Json(entries))
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> FileManagerError {
    FileManagerError::BadRequest(format!("Invalid form data: {}", e.body_text()))
}

/// `DELETE /delete`: JSON array of percent-encoded paths, as returned by listings
pub async fn delete_files(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, FileManagerError> {
    let paths: Vec<String> = serde_json::from_slice(&body)
        .map_err(|_| FileManagerError::BadRequest("Invalid request body".into()))?;

    operations::delete_paths(&state.resolver, paths).await?;
    Ok("Files/Directories deleted successfully")
}

/// `POST /create`: JSON `{path, isDir, content?}`
pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FileEntry>, FileManagerError> {
    let request: CreateItemRequest = serde_json::from_slice(&body)
        .map_err(|_| FileManagerError::BadRequest("Invalid request body".into()))?;

    let entry = operations::create_item(&state.resolver, request).await?;
    Ok(Json(entry))
}

/// `POST /UserData/*`: raw text body replaces the target file
pub async fn save_file_text(
    State(state): State<AppState>,
    uri: Uri,
    text: String,
) -> Result<&'static str, FileManagerError> {
    let encoded = super::listing::user_data_suffix(uri.path());
    operations::save_text(&state.resolver, encoded, &text).await?;
    Ok("File saved successfully")
}
