//! UserData file manager
//!
//! HTTP service exposing a single sandboxed directory tree for listing,
//! download, upload, text editing, creation and deletion, plus discovery of
//! map and mode script files.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::FileManagerConfig;
pub use server::{AppState, Server, build_router};
