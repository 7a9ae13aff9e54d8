//! Storage operations
//!
//! Handles the mutating file operations: upload, delete, create and save-text.
//! Every target is resolved through [`PathResolver`] before the filesystem is touched.

use log::info;
use std::io;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::FileManagerError;
use crate::error::handlers::handle_error;
use crate::storage::results::{BatchReport, CreateItemRequest, FileEntry, UploadedFile};
use crate::storage::validation::{PathResolver, ResolvedPath, base_name, is_probably_directory};

/// Stores uploaded files at their destinations.
///
/// `files` and `paths` pair up by position. A failing item does not stop the others;
/// if any item fails the whole call reports an aggregate error.
pub async fn upload_files(
    resolver: &PathResolver,
    files: Vec<UploadedFile>,
    paths: Vec<String>,
) -> Result<Vec<FileEntry>, FileManagerError> {
    if files.is_empty() {
        return Err(FileManagerError::BadRequest("No files found".into()));
    }

    if files.len() != paths.len() {
        return Err(FileManagerError::BadRequest(
            "Number of files and paths do not match".into(),
        ));
    }

    let mut report = BatchReport::default();
    for (file, destination) in files.into_iter().zip(paths) {
        let outcome = upload_file(resolver, &file, &destination).await;
        if let Err(e) = &outcome {
            handle_error(e);
        }
        report.record(outcome);
    }

    info!(
        "Upload finished: {} stored, {} failed",
        report.results.len(),
        report.errors.len()
    );
    report.into_result("Some files could not be uploaded")
}

async fn upload_file(
    resolver: &PathResolver,
    file: &UploadedFile,
    destination: &str,
) -> Result<FileEntry, FileManagerError> {
    let destination = if is_probably_directory(destination) {
        let name = base_name(&file.file_name).ok_or_else(|| {
            FileManagerError::BadRequest(format!("Missing file name for upload to {destination}"))
        })?;
        format!("{}/{}", destination.trim_end_matches('/'), name)
    } else {
        destination.to_string()
    };

    let target = resolver.resolve_virtual(&destination)?;
    if target.is_root() {
        return Err(FileManagerError::PathEscape(destination));
    }

    create_parent_dirs(&target).await?;

    write_upload(&target, &file.data)
        .await
        .map_err(|e| FileManagerError::access("Failed to save file", &file.file_name, e))?;

    let metadata = fs::metadata(&target.absolute).await.map_err(|e| {
        FileManagerError::access("Failed to get file info", &file.file_name, e)
    })?;

    info!(
        "File uploaded: {} ({} bytes)",
        target.absolute.display(),
        metadata.len()
    );
    Ok(FileEntry::from_metadata(target.name(), target.virtual_path(), &metadata))
}

// Truncates an existing file; writes straight from the received buffer
async fn write_upload(target: &ResolvedPath, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(&target.absolute).await?;
    file.write_all(data).await?;
    file.flush().await
}

/// Deletes files and directories (recursively).
///
/// Like uploads, each path is handled independently and failures are aggregated.
pub async fn delete_paths(
    resolver: &PathResolver,
    paths: Vec<String>,
) -> Result<(), FileManagerError> {
    if paths.is_empty() {
        return Err(FileManagerError::BadRequest("No file paths provided".into()));
    }

    let mut report = BatchReport::default();
    for path in &paths {
        let outcome = delete_path(resolver, path).await;
        if let Err(e) = &outcome {
            handle_error(e);
        }
        report.record(outcome);
    }

    report
        .into_result("Some files/directories could not be deleted")
        .map(|_| ())
}

async fn delete_path(resolver: &PathResolver, path: &str) -> Result<(), FileManagerError> {
    let target = resolver.resolve_virtual(path)?;
    if target.is_root() {
        return Err(FileManagerError::PathEscape(path.to_string()));
    }

    // symlink_metadata so that a link is removed rather than its target
    let metadata = fs::symlink_metadata(&target.absolute)
        .await
        .map_err(|e| FileManagerError::from_io("Error checking file existence", path, e))?;

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(&target.absolute).await
    } else {
        fs::remove_file(&target.absolute).await
    };
    removed.map_err(|e| FileManagerError::access("Failed to delete", path, e))?;

    info!("File/Directory deleted: {}", target.absolute.display());
    Ok(())
}

/// Creates a new file or directory. Fails with `Conflict` if anything already exists
/// at the target.
pub async fn create_item(
    resolver: &PathResolver,
    request: CreateItemRequest,
) -> Result<FileEntry, FileManagerError> {
    request.validate()?;

    let target = resolver.resolve_virtual(&request.path)?;
    let display_path = target.virtual_path();

    match fs::symlink_metadata(&target.absolute).await {
        Ok(_) => return Err(FileManagerError::Conflict(display_path)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(FileManagerError::access(
                "Error checking file existence",
                display_path,
                e,
            ));
        }
    }

    if request.is_dir {
        fs::create_dir_all(&target.absolute).await.map_err(|e| {
            FileManagerError::access("Failed to create directory", &display_path, e)
        })?;
    } else {
        create_parent_dirs(&target).await?;
        write_new_file(&target, request.content.as_deref().unwrap_or_default()).await?;
    }

    let metadata = fs::metadata(&target.absolute).await.map_err(|e| {
        FileManagerError::access("Failed to get file info", &display_path, e)
    })?;

    info!(
        "Item created: {} (dir: {})",
        target.absolute.display(),
        request.is_dir
    );
    Ok(FileEntry::from_metadata(target.name(), display_path, &metadata))
}

async fn write_new_file(target: &ResolvedPath, content: &str) -> Result<(), FileManagerError> {
    let display_path = target.virtual_path();
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target.absolute)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => FileManagerError::Conflict(display_path.clone()),
            _ => FileManagerError::access("Failed to create file", &display_path, e),
        })?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| FileManagerError::access("Failed to create file", &display_path, e))?;
    file.flush()
        .await
        .map_err(|e| FileManagerError::access("Failed to create file", &display_path, e))
}

/// Writes `text` to the URL-encoded `client_path`, replacing any existing content.
pub async fn save_text(
    resolver: &PathResolver,
    client_path: &str,
    text: &str,
) -> Result<ResolvedPath, FileManagerError> {
    let target = resolver.resolve(client_path)?;

    create_parent_dirs(&target).await?;

    fs::write(&target.absolute, text).await.map_err(|e| {
        FileManagerError::access("Failed to write file", target.virtual_path(), e)
    })?;

    info!(
        "File saved: {} ({} bytes)",
        target.absolute.display(),
        text.len()
    );
    Ok(target)
}

async fn create_parent_dirs(target: &ResolvedPath) -> Result<(), FileManagerError> {
    let Some(parent) = target.absolute.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent)
        .await
        .map_err(|e| FileManagerError::access("Failed to create directory", target.virtual_path(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        (temp, PathResolver::new(root))
    }

    fn upload(name: &str, data: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            data: Bytes::copy_from_slice(data.as_bytes()),
        }
    }

    #[tokio::test]
    async fn upload_into_directory_appends_file_name() {
        let (_temp, resolver) = setup();

        let entries = upload_files(
            &resolver,
            vec![upload("A01.Map.Gbx", "map"), upload("notes.txt", "hello")],
            vec!["/UserData/Maps/Campaign/".into(), "/UserData/Docs/readme.md".into()],
        )
        .await
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "/UserData/Maps/Campaign/A01.Map.Gbx");
        assert_eq!(entries[0].size, 3);
        assert!(entries[0].last_modified.is_some());
        assert_eq!(entries[1].name, "readme.md");
        assert_eq!(
            std::fs::read_to_string(resolver.root().join("Docs/readme.md")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn upload_overwrites_existing_file() {
        let (_temp, resolver) = setup();
        std::fs::write(resolver.root().join("a.txt"), "old content").unwrap();

        upload_files(&resolver, vec![upload("a.txt", "new")], vec!["/".into()])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(resolver.root().join("a.txt")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn upload_count_mismatch_writes_nothing() {
        let (_temp, resolver) = setup();

        let result = upload_files(
            &resolver,
            vec![upload("a.txt", "a"), upload("b.txt", "b")],
            vec!["Maps/".into()],
        )
        .await;
        assert!(matches!(result, Err(FileManagerError::BadRequest(_))));

        let result = upload_files(&resolver, Vec::new(), Vec::new()).await;
        assert!(matches!(result, Err(FileManagerError::BadRequest(_))));

        assert_eq!(std::fs::read_dir(resolver.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn upload_escape_is_isolated_per_item() {
        let (_temp, resolver) = setup();

        let result = upload_files(
            &resolver,
            vec![upload("evil.txt", "x"), upload("good.txt", "y")],
            vec!["/UserData/../../tmp/".into(), "/UserData/Scripts/".into()],
        )
        .await;

        match result {
            Err(FileManagerError::Batch { message, errors }) => {
                assert_eq!(message, "Some files could not be uploaded");
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("Invalid path"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(resolver.root().join("Scripts/good.txt").is_file());
    }

    #[tokio::test]
    async fn upload_write_failure_is_isolated_per_item() {
        let (_temp, resolver) = setup();
        std::fs::write(resolver.root().join("blocker.txt"), "not a directory").unwrap();

        let result = upload_files(
            &resolver,
            vec![
                upload("a.txt", "a"),
                upload("b.Map.Gbx", "b"),
                upload("c.txt", "c"),
            ],
            vec![
                "/UserData/Docs/".into(),
                "/UserData/blocker.txt/Maps/b.Map.Gbx".into(),
                "/UserData/Docs/c.txt".into(),
            ],
        )
        .await;

        match result {
            Err(FileManagerError::Batch { message, errors }) => {
                assert_eq!(message, "Some files could not be uploaded");
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("Failed to create directory"), "{}", errors[0]);
            }
            other => panic!("unexpected {other:?}"),
        }
        let root = resolver.root();
        assert_eq!(std::fs::read_to_string(root.join("Docs/a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(root.join("Docs/c.txt")).unwrap(), "c");
        assert_eq!(
            std::fs::read_to_string(root.join("blocker.txt")).unwrap(),
            "not a directory"
        );
    }

    #[tokio::test]
    async fn delete_continues_past_missing_paths() {
        let (_temp, resolver) = setup();
        let root = resolver.root();
        std::fs::create_dir_all(root.join("Maps/Old")).unwrap();
        std::fs::write(root.join("Maps/Old/a.Map.Gbx"), "a").unwrap();
        std::fs::write(root.join("b.txt"), "b").unwrap();

        let result = delete_paths(
            &resolver,
            vec![
                "/UserData/missing.txt".into(),
                "/UserData/Maps/Old".into(),
                "b.txt".into(),
            ],
        )
        .await;

        match result {
            Err(FileManagerError::Batch { errors, .. }) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("/UserData/missing.txt"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!root.join("Maps/Old").exists());
        assert!(!root.join("b.txt").exists());
        assert!(root.join("Maps").is_dir());
    }

    #[tokio::test]
    async fn delete_rejects_root_and_escapes() {
        let (_temp, resolver) = setup();
        std::fs::write(resolver.root().join("keep.txt"), "k").unwrap();

        let result = delete_paths(&resolver, vec!["/UserData".into(), "../x".into()]).await;
        match result {
            Err(FileManagerError::Batch { errors, .. }) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(resolver.root().join("keep.txt").is_file());

        let result = delete_paths(&resolver, Vec::new()).await;
        assert!(matches!(result, Err(FileManagerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn create_file_then_conflict() {
        let (_temp, resolver) = setup();
        let request = CreateItemRequest {
            path: "Scripts/Modes/Custom.Script.txt".into(),
            is_dir: false,
            content: Some("#RequireContext".into()),
        };

        let entry = create_item(&resolver, request.clone()).await.unwrap();
        assert_eq!(entry.name, "Custom.Script.txt");
        assert_eq!(entry.path, "/UserData/Scripts/Modes/Custom.Script.txt");
        assert!(!entry.is_dir);
        assert_eq!(entry.size, "#RequireContext".len() as u64);

        let again = create_item(&resolver, request).await;
        assert!(matches!(again, Err(FileManagerError::Conflict(_))));
        assert_eq!(
            std::fs::read_to_string(resolver.root().join("Scripts/Modes/Custom.Script.txt"))
                .unwrap(),
            "#RequireContext"
        );
    }

    #[tokio::test]
    async fn create_directory_and_empty_file() {
        let (_temp, resolver) = setup();

        let entry = create_item(
            &resolver,
            CreateItemRequest {
                path: "/UserData/Maps/New Folder".into(),
                is_dir: true,
                content: Some("ignored".into()),
            },
        )
        .await
        .unwrap();
        assert!(entry.is_dir);
        assert_eq!(entry.size, 0);
        assert!(entry.last_modified.is_none());
        assert!(resolver.root().join("Maps/New Folder").is_dir());

        let entry = create_item(
            &resolver,
            CreateItemRequest {
                path: "empty.txt".into(),
                is_dir: false,
                content: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(entry.size, 0);
        assert!(resolver.root().join("empty.txt").is_file());
    }

    #[tokio::test]
    async fn create_rejects_escape() {
        let (_temp, resolver) = setup();
        let result = create_item(
            &resolver,
            CreateItemRequest {
                path: "../outside".into(),
                is_dir: true,
                content: None,
            },
        )
        .await;
        assert!(matches!(result, Err(FileManagerError::PathEscape(_))));
    }

    #[tokio::test]
    async fn save_text_overwrites() {
        let (_temp, resolver) = setup();

        save_text(&resolver, "Config/server%20settings.txt", "first").await.unwrap();
        let target = save_text(&resolver, "Config/server%20settings.txt", "second")
            .await
            .unwrap();

        assert_eq!(target.virtual_path(), "/UserData/Config/server settings.txt");
        assert_eq!(std::fs::read_to_string(&target.absolute).unwrap(), "second");
    }

    #[tokio::test]
    async fn save_text_rejects_escape_and_bad_encoding() {
        let (_temp, resolver) = setup();
        assert!(matches!(
            save_text(&resolver, "../../etc/passwd", "x").await,
            Err(FileManagerError::PathEscape(_))
        ));
        assert!(matches!(
            save_text(&resolver, "bad%zz.txt", "x").await,
            Err(FileManagerError::InvalidEncoding(_))
        ));
    }
}
