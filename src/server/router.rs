//! Route table

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handlers;
use crate::middleware::logging::log_request;
use crate::server::state::AppState;

/// Builds the application router with body limit, request logging and panic recovery.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/UserData", get(handlers::list_user_data))
        // `{*path}` never matches an empty remainder
        .route("/UserData/", get(handlers::list_user_data))
        .route(
            "/UserData/{*path}",
            get(handlers::list_user_data).post(handlers::save_file_text),
        )
        .route("/upload", post(handlers::upload_files))
        .route("/delete", delete(handlers::delete_files))
        .route("/create", post(handlers::create_item))
        .route("/maps", get(handlers::list_maps))
        .route("/scripts", get(handlers::list_scripts))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
