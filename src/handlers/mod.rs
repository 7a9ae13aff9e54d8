//! HTTP request handlers
//!
//! Handlers only decode the request, delegate to `storage` or `listing`,
//! and shape the response.

mod files;
mod listing;

pub use files::{create_item, delete_files, save_file_text, upload_files};
pub use listing::{health, list_maps, list_scripts, list_user_data};
