//! Result types for listing operations

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::storage::FileEntry;

static MAPS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(Map|Challenge).*\.Gbx$").expect("valid maps pattern"));

static SCRIPTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.Script\.txt$").expect("valid scripts pattern"));

/// What a `/UserData/*` GET resolved to
#[derive(Debug)]
pub enum Listing {
    /// A regular file, to be streamed back
    File(PathBuf),
    /// Immediate children of a directory, sorted by name
    Directory(Vec<FileEntry>),
}

/// File categories discoverable under fixed subdirectories of the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Maps,
    Scripts,
}

impl FileCategory {
    /// Subdirectory of the root that is searched
    pub fn subdirectory(&self) -> &'static str {
        match self {
            FileCategory::Maps => "Maps",
            FileCategory::Scripts => "Scripts/Modes",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            FileCategory::Maps => &MAPS_PATTERN,
            FileCategory::Scripts => &SCRIPTS_PATTERN,
        }
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.pattern().is_match(relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pattern() {
        let maps = FileCategory::Maps;
        assert!(maps.matches("A01-Race.Map.Gbx"));
        assert!(maps.matches("Campaign/Spring 2024/01.Map.Gbx"));
        assert!(maps.matches("Old/Stadium.Challenge.Gbx"));
        assert!(maps.matches("lower.map.gbx"));
        assert!(maps.matches("Track.Map.Custom.Gbx"));
        assert!(!maps.matches("readme.txt"));
        assert!(!maps.matches("Replay.Replay.Gbx"));
        assert!(!maps.matches("A01.Map.Gbx.bak"));
    }

    #[test]
    fn scripts_pattern_is_case_sensitive() {
        let scripts = FileCategory::Scripts;
        assert!(scripts.matches("TimeAttack.Script.txt"));
        assert!(scripts.matches("Custom/Rounds.Script.txt"));
        assert!(!scripts.matches("TimeAttack.script.txt"));
        assert!(!scripts.matches("Libs/Utils.Script.txt.old"));
        assert!(!scripts.matches("notes.txt"));
    }
}
