//! Listing operations implementation

use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

use crate::error::FileManagerError;
use crate::listing::results::{FileCategory, Listing};
use crate::storage::{FileEntry, ResolvedPath};
use crate::storage::validation::virtual_path;

/// Lists the immediate children of a directory, or hands back the path of a file.
pub async fn list_directory(target: &ResolvedPath) -> Result<Listing, FileManagerError> {
    let display_path = target.virtual_path();

    let metadata = fs::metadata(&target.absolute)
        .await
        .map_err(|e| FileManagerError::from_io("Error accessing path", &display_path, e))?;

    if !metadata.is_dir() {
        return Ok(Listing::File(target.absolute.clone()));
    }

    let mut reader = fs::read_dir(&target.absolute)
        .await
        .map_err(|e| FileManagerError::access("Failed to read directory", &display_path, e))?;

    let mut entries = Vec::new();
    loop {
        let entry = match reader.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                return Err(FileManagerError::access("Failed to read directory", &display_path, e));
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let path = virtual_path(&format!("{}/{}", target.relative.trim_end_matches('/'), name));

        match entry.metadata().await {
            Ok(metadata) => entries.push(FileEntry::from_metadata(name, path, &metadata)),
            Err(e) => {
                // Entry vanished or is unreadable; report what the directory walk knows
                debug!("No metadata for {}: {}", entry.path().display(), e);
                let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
                entries.push(FileEntry {
                    name,
                    path,
                    is_dir,
                    size: 0,
                    last_modified: None,
                });
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    info!("Listed directory {} - {} entries", display_path, entries.len());
    Ok(Listing::Directory(entries))
}

/// Walks the subtree under `dir`, returning every non-directory entry as a
/// `/`-separated path relative to `dir`, sorted.
///
/// `label` names `dir` in error messages. A missing `dir` is `NotFound`.
pub fn list_files_recursive(dir: &Path, label: &str) -> Result<Vec<String>, FileManagerError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let at_root = e.depth() == 0;
            let source: io::Error = e.into();
            if at_root && source.kind() == io::ErrorKind::NotFound {
                FileManagerError::NotFound(label.to_string())
            } else {
                FileManagerError::access("Failed to walk directory", label, source)
            }
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(relative);
    }

    files.sort();
    Ok(files)
}

/// Lists the files of a category under `root`.
///
/// A missing category directory yields an empty list.
pub async fn list_category(
    root: &Path,
    category: FileCategory,
) -> Result<Vec<String>, FileManagerError> {
    let dir: PathBuf = root.join(category.subdirectory());
    let label = category.subdirectory();

    let walked = tokio::task::spawn_blocking(move || list_files_recursive(&dir, label))
        .await
        .map_err(|e| FileManagerError::access("Failed to list files", label, io::Error::other(e)))?;

    let files = match walked {
        Ok(files) => files,
        Err(FileManagerError::NotFound(_)) => {
            debug!("{} directory does not exist, nothing to list", label);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let filtered: Vec<String> = files.into_iter().filter(|f| category.matches(f)).collect();
    info!("Found {} {:?} files under {}", filtered.len(), category, label);
    Ok(filtered)
}
