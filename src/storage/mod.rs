//! UserData storage management
//!
//! Handles path resolution and the mutating file operations.

pub mod operations;
pub mod results;
pub mod validation;

// Re-export commonly used types
pub use results::{BatchReport, CreateItemRequest, FileEntry, UploadedFile};
pub use validation::{PathResolver, ResolvedPath, VIRTUAL_ROOT};
