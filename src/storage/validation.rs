//! Path validation
//!
//! Resolves client-supplied paths against the UserData root and rejects
//! anything that would land outside of it. Normalization is purely lexical:
//! the filesystem is never consulted and symlinks are not followed.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// Prefix under which the root is exposed to clients
pub const VIRTUAL_ROOT: &str = "/UserData";

/// A client path that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute location on disk, always under the root
    pub absolute: PathBuf,
    /// Normalized root-relative form with a single leading `/`; `/` for the root itself
    pub relative: String,
}

impl ResolvedPath {
    pub fn is_root(&self) -> bool {
        self.relative == "/"
    }

    /// Client-facing path, e.g. `/UserData/Maps/A01.Map.Gbx`
    pub fn virtual_path(&self) -> String {
        virtual_path(&self.relative)
    }

    /// Base name of the target; empty for the root
    pub fn name(&self) -> String {
        self.relative
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// Sandboxes client paths under a fixed root directory
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` should already be absolute and canonical.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` is the root or below it, compared component by component
    /// so that `/data/user2` is not considered inside `/data/user`.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve a percent-encoded path taken from a URL (the part after `/UserData`).
    pub fn resolve(&self, client_path: &str) -> Result<ResolvedPath, PathError> {
        let decoded = decode_client_path(client_path)?;
        self.resolve_relative(&decoded, client_path)
    }

    /// Resolve a path supplied in a request body.
    ///
    /// These may carry the `/UserData` prefix returned by listings, which is stripped
    /// before resolution.
    pub fn resolve_virtual(&self, client_path: &str) -> Result<ResolvedPath, PathError> {
        let decoded = decode_client_path(client_path)?;
        self.resolve_relative(strip_virtual_root(&decoded), client_path)
    }

    fn resolve_relative(&self, relative: &str, original: &str) -> Result<ResolvedPath, PathError> {
        let segments =
            normalize_segments(relative).ok_or_else(|| PathError::Escape(original.to_string()))?;

        let mut absolute = self.root.clone();
        for segment in &segments {
            absolute.push(segment);
        }

        if !self.contains(&absolute) {
            return Err(PathError::Escape(original.to_string()));
        }

        Ok(ResolvedPath {
            absolute,
            relative: format!("/{}", segments.join("/")),
        })
    }
}

/// Percent-decode a client path.
///
/// A `%` not followed by two hex digits, or a decoded byte sequence that is not
/// UTF-8, is rejected.
pub fn decode_client_path(encoded: &str) -> Result<String, PathError> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(PathError::InvalidEncoding(encoded.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(encoded)
        .map(Cow::into_owned)
        .map_err(|_| PathError::InvalidEncoding(encoded.to_string()))
}

/// Collapse `.`, `..` and empty segments. Returns `None` when `..` climbs above the root
/// or a segment is not a plain name on this platform.
fn normalize_segments(relative: &str) -> Option<Vec<String>> {
    let mut segments: Vec<String> = Vec::new();

    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop()?;
            }
            name => {
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(name.to_string()),
                    _ => return None,
                }
            }
        }
    }

    Some(segments)
}

/// Drop a leading `/UserData` segment, if present.
pub fn strip_virtual_root(path: &str) -> &str {
    match path.strip_prefix(VIRTUAL_ROOT) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Client-facing path for a normalized root-relative path.
///
/// `%` is written as `%25` so the result decodes back to the same node when sent
/// to any endpoint; every other character is left as is.
pub fn virtual_path(relative: &str) -> String {
    let relative = relative.trim_start_matches('/').replace('%', "%25");
    if relative.is_empty() {
        VIRTUAL_ROOT.to_string()
    } else {
        format!("{VIRTUAL_ROOT}/{relative}")
    }
}

/// An upload destination names a directory when it ends with `/` or its last
/// element has no extension.
pub fn is_probably_directory(path: &str) -> bool {
    if path.ends_with('/') {
        return true;
    }
    let last = path.rsplit('/').next().unwrap_or_default();
    !last.contains('.')
}

/// Base name of an uploaded file as sent by the client, which may include a
/// client-side directory using either separator.
pub fn base_name(file_name: &str) -> Option<&str> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}
