//! Shared request state

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::FileManagerConfig;
use crate::storage::PathResolver;

/// Immutable state handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<FileManagerConfig>,
    pub resolver: Arc<PathResolver>,
}

impl AppState {
    /// `root` is the prepared (absolute, canonical) UserData directory.
    pub fn new(config: FileManagerConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(PathResolver::new(root)),
        }
    }
}
