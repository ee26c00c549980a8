use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use walkdir::WalkDir;

use crate::filter::PathFilter;
use crate::scan::types::ScanRoots;

/// Enumerates candidate file paths for a scan.
///
/// Explicit files come first, then each root directory is traversed
/// recursively, following symbolic links. Directories matching an
/// exclusion rule are pruned before descent, excluded files are dropped,
/// and every yielded path is canonicalized and deduplicated, with
/// explicit files taking precedence over paths found by traversal.
/// Traversal order beyond set equality is not guaranteed.
#[derive(Debug)]
pub struct Walker<'a> {
    /// Exclusion rules applied during traversal
    filter: &'a PathFilter,
}

impl<'a> Walker<'a> {
    /// Create a walker over the given exclusion rules
    pub fn new(filter: &'a PathFilter) -> Self {
        Self { filter }
    }

    /// Collect every candidate path reachable from the given roots
    pub fn walk(&self, roots: &ScanRoots) -> Vec<PathBuf> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut candidates = Vec::new();

        for file in &roots.explicit_files {
            let resolved = resolve(file);
            if seen.insert(resolved.clone()) {
                trace!("Explicit file: {}", resolved.display());
                candidates.push(resolved);
            }
        }

        for dir in &roots.directories {
            let root = resolve(dir);
            debug!("Traversing directory: {}", root.display());

            let entries = WalkDir::new(&root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|entry| {
                    !(entry.file_type().is_dir()
                        && self.filter.excludes_directory(entry.path()))
                });

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        // Covers unreadable directories and symlink loops
                        warn!("Skipping unreadable entry: {}", err);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if self.filter.excludes_file(entry.path()) {
                    continue;
                }
                let resolved = resolve(entry.path());
                if seen.insert(resolved.clone()) {
                    candidates.push(resolved);
                }
            }
        }

        debug!("Collected {} candidate files", candidates.len());
        candidates
    }
}

/// Canonicalize a path, falling back to an absolute form when the path
/// cannot be resolved (e.g. it does not exist yet)
pub(crate) fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
