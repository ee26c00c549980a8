use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The roots of one scan: directory trees to traverse plus individual
/// files to scan regardless of traversal
#[derive(Debug, Clone, Default)]
pub struct ScanRoots {
    /// Directories traversed recursively
    pub directories: Vec<PathBuf>,

    /// Files scanned unconditionally, ahead of traversal
    pub explicit_files: Vec<PathBuf>,
}

impl ScanRoots {
    /// Build roots from a mixed list of paths, splitting directories
    /// from files by filesystem metadata
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut roots = Self::default();
        for path in paths {
            if path.is_dir() {
                roots.directories.push(path);
            } else {
                roots.explicit_files.push(path);
            }
        }
        roots
    }
}

/// One occurrence of an annotation pattern on one line of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Resolved path of the file containing the match
    pub filepath: PathBuf,

    /// 1-based line number of the match
    pub line_number: usize,

    /// Name of the annotation pattern that matched
    pub pattern_name: String,

    /// Captured note text; may be empty but never absent
    pub note_text: String,

    /// Priority from a parenthesized marker in the note, 0..=99, or
    /// 100 when the note carries none
    pub priority: u8,
}

/// All matches for one pattern name, in final presentation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// The shared pattern name of every record in this group
    pub pattern_name: String,

    /// Records ordered by the configured sort key
    pub records: Vec<MatchRecord>,
}

/// The outcome of one completed scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Match groups in presentation order
    pub groups: Vec<MatchGroup>,

    /// Wall-clock seconds from job start to collection completion
    pub elapsed_secs: f64,

    /// Number of files attempted, readable or not
    pub files_scanned: usize,
}

impl ScanResult {
    /// Total number of match records across all groups
    pub fn total_matches(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }
}
