//! Listing module
//!
//! Directory listings for `/UserData/*` and recursive discovery of maps and
//! mode scripts.

mod operations;
mod results;

// Re-export public types and functions
pub use operations::{list_category, list_directory, list_files_recursive};
pub use results::{FileCategory, Listing};
