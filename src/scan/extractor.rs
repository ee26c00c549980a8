use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, trace};

use crate::pattern::CompiledPatternSet;
use crate::scan::counter::ScanCounter;
use crate::scan::types::MatchRecord;

/// Supplies in-memory line content for paths the caller already has
/// open, so unsaved edits stay authoritative over the file on disk
pub trait BufferSource: Send + Sync {
    /// Lines for the given resolved path, or `None` to read from disk
    fn lines(&self, path: &Path) -> Option<Vec<String>>;
}

impl BufferSource for HashMap<PathBuf, Vec<String>> {
    fn lines(&self, path: &Path) -> Option<Vec<String>> {
        self.get(path).cloned()
    }
}

/// Scans candidate files line by line against a compiled pattern set.
///
/// Files that cannot be read or decoded are skipped without aborting the
/// scan, and every attempted file bumps the counter exactly once whether
/// it produced matches or not.
pub struct Extractor<'a> {
    /// Compiled annotation patterns
    patterns: &'a CompiledPatternSet,

    /// Optional provider of in-memory buffers keyed by resolved path
    buffers: Option<&'a dyn BufferSource>,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over a compiled pattern set
    pub fn new(patterns: &'a CompiledPatternSet) -> Self {
        Self {
            patterns,
            buffers: None,
        }
    }

    /// Attach an open-buffer provider consulted before the filesystem
    pub fn with_buffers(mut self, buffers: &'a dyn BufferSource) -> Self {
        self.buffers = Some(buffers);
        self
    }

    /// Scan every candidate path, collecting all match records.
    ///
    /// The counter is incremented once per path after its processing
    /// completes, on both the success and the failure path.
    pub fn extract(&self, paths: &[PathBuf], counter: &ScanCounter) -> Vec<MatchRecord> {
        let mut records = Vec::new();

        for path in paths {
            match self.read_lines(path) {
                Ok(lines) => {
                    for (index, line) in lines.iter().enumerate() {
                        self.scan_line(path, index + 1, line, &mut records);
                    }
                }
                Err(err) => {
                    debug!("Skipping file {}: {:#}", path.display(), err);
                }
            }
            counter.increment();
        }

        debug!("Extracted {} matches", records.len());
        records
    }

    fn scan_line(
        &self,
        path: &Path,
        line_number: usize,
        line: &str,
        records: &mut Vec<MatchRecord>,
    ) {
        for (pattern_name, note_text) in self.patterns.find_matches(line) {
            trace!(
                "{}:{} {} {}",
                path.display(),
                line_number,
                pattern_name,
                note_text
            );
            records.push(MatchRecord {
                filepath: path.to_path_buf(),
                line_number,
                pattern_name: pattern_name.to_string(),
                note_text: note_text.to_string(),
                priority: CompiledPatternSet::priority(note_text),
            });
        }
    }

    /// Read the lines of a candidate, preferring an open buffer over the
    /// file on disk. Files must decode as UTF-8.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        if let Some(buffers) = self.buffers {
            if let Some(lines) = buffers.lines(path) {
                trace!("Reading open buffer for {}", path.display());
                return Ok(lines);
            }
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(content.lines().map(str::to_string).collect())
    }
}
