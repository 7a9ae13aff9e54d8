//! Listing, download and discovery handlers

use axum::Json;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use log::info;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::FileManagerError;
use crate::listing::{self, FileCategory, Listing};
use crate::server::AppState;
use crate::storage::VIRTUAL_ROOT;

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// Part of a request path after `/UserData`, still percent-encoded.
pub(crate) fn user_data_suffix(path: &str) -> &str {
    path.strip_prefix(VIRTUAL_ROOT).unwrap_or_default()
}

/// `GET /UserData/*`: JSON listing for directories, file contents otherwise
pub async fn list_user_data(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, FileManagerError> {
    let target = state
        .resolver
        .resolve(user_data_suffix(request.uri().path()))?;

    match listing::list_directory(&target).await? {
        Listing::Directory(entries) => Ok(Json(entries).into_response()),
        Listing::File(path) => {
            info!("Serving file {}", path.display());
            let response = match ServeFile::new(path).oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };
            Ok(response.map(Body::new))
        }
    }
}

/// `GET /maps`
pub async fn list_maps(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, FileManagerError> {
    let maps = listing::list_category(state.resolver.root(), FileCategory::Maps).await?;
    Ok(Json(maps))
}

/// `GET /scripts`
pub async fn list_scripts(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, FileManagerError> {
    let scripts = listing::list_category(state.resolver.root(), FileCategory::Scripts).await?;
    Ok(Json(scripts))
}
