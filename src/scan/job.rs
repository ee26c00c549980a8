use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::ScanConfig;
use crate::error::ConfigError;
use crate::filter::PathFilter;
use crate::pattern::CompiledPatternSet;
use crate::scan::counter::ScanCounter;
use crate::scan::extractor::{BufferSource, Extractor};
use crate::scan::types::{MatchGroup, MatchRecord, ScanResult, ScanRoots};
use crate::scan::walker::Walker;

/// One end-to-end scan: traversal, extraction, sorting and grouping.
///
/// Patterns and filters are compiled up front, so configuration errors
/// surface synchronously before any file I/O; once a job is constructed
/// it cannot fail, only complete. Each job owns its own counter, keeping
/// concurrent jobs fully independent.
pub struct ScanJob {
    /// Compiled annotation patterns
    patterns: Arc<CompiledPatternSet>,

    /// Compiled exclusion rules
    filter: Arc<PathFilter>,

    /// Sort weight per uppercase pattern name
    weights: BTreeMap<String, String>,

    /// Directories and explicit files to scan
    roots: ScanRoots,

    /// Optional provider of in-memory buffers
    buffers: Option<Arc<dyn BufferSource>>,

    /// Files-attempted counter shared with progress observers
    counter: Arc<ScanCounter>,
}

impl ScanJob {
    /// Compile a job from configuration and roots.
    ///
    /// This is the only point a scan can fail; per-file errors during the
    /// run are absorbed.
    pub fn new(config: &ScanConfig, roots: ScanRoots) -> Result<Self, ConfigError> {
        let patterns = CompiledPatternSet::compile(&config.patterns, config.case_sensitive)?;
        let filter = PathFilter::compile(&config.exclude_files, &config.exclude_dirs)?;

        Ok(Self {
            patterns: Arc::new(patterns),
            filter: Arc::new(filter),
            weights: config.sort_weights.clone(),
            roots,
            buffers: None,
            counter: Arc::new(ScanCounter::new()),
        })
    }

    /// Attach an open-buffer provider consulted before the filesystem
    pub fn with_buffers(mut self, buffers: Arc<dyn BufferSource>) -> Self {
        self.buffers = Some(buffers);
        self
    }

    /// The counter this job increments, for progress polling
    pub fn counter(&self) -> Arc<ScanCounter> {
        Arc::clone(&self.counter)
    }

    /// Run the scan to completion on the current thread
    pub fn run(&self) -> ScanResult {
        let start = Instant::now();
        self.counter.reset();

        let walker = Walker::new(&self.filter);
        let paths = walker.walk(&self.roots);

        let mut extractor = Extractor::new(&self.patterns);
        if let Some(buffers) = self.buffers.as_deref() {
            extractor = extractor.with_buffers(buffers);
        }
        let records = extractor.extract(&paths, &self.counter);

        let groups = sort_and_group(records, &self.weights);
        let result = ScanResult {
            groups,
            elapsed_secs: start.elapsed().as_secs_f64(),
            files_scanned: self.counter.value(),
        };

        info!(
            "Scan complete: {} matches in {} files ({:.2}s)",
            result.total_matches(),
            result.files_scanned,
            result.elapsed_secs
        );
        result
    }

    /// Run the scan on a dedicated worker thread.
    ///
    /// The returned handle exposes the live counter for progress polling
    /// and delivers the result over a channel once every candidate has
    /// been attempted.
    pub fn spawn(self) -> ScanHandle {
        let counter = self.counter();
        let (sender, receiver) = mpsc::channel();

        debug!("Spawning scan worker");
        let worker = thread::spawn(move || {
            // A dropped receiver just means nobody is waiting
            let _ = sender.send(self.run());
        });

        ScanHandle {
            counter,
            receiver,
            worker,
        }
    }
}

/// Handle to a scan running on a background worker
pub struct ScanHandle {
    /// Live counter incremented by the worker
    counter: Arc<ScanCounter>,

    /// Delivers the result exactly once on completion
    receiver: Receiver<ScanResult>,

    /// The worker thread itself
    worker: JoinHandle<()>,
}

impl ScanHandle {
    /// The counter the running scan increments
    pub fn counter(&self) -> Arc<ScanCounter> {
        Arc::clone(&self.counter)
    }

    /// Whether the worker has finished
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Take the result if the scan has completed
    pub fn try_result(&self) -> Option<ScanResult> {
        self.receiver.try_recv().ok()
    }

    /// Block until the scan completes and return its result
    pub fn wait(self) -> Result<ScanResult> {
        let result = self
            .receiver
            .recv()
            .context("Scan worker terminated without a result")?;
        let _ = self.worker.join();
        Ok(result)
    }
}

/// Stable-sort records by (weight-or-name, priority) and group contiguous
/// runs of the same pattern name.
///
/// A pattern with a configured weight sorts by it; otherwise the pattern
/// name itself is the primary key, so unweighted patterns order
/// alphabetically after weighted ones compare ahead of them.
pub(crate) fn sort_and_group(
    mut records: Vec<MatchRecord>,
    weights: &BTreeMap<String, String>,
) -> Vec<MatchGroup> {
    records.sort_by_cached_key(|record| {
        let key = weights
            .get(&record.pattern_name.to_uppercase())
            .cloned()
            .unwrap_or_else(|| record.pattern_name.clone());
        (key, record.priority)
    });

    let mut groups: Vec<MatchGroup> = Vec::new();
    for record in records {
        match groups.last_mut() {
            Some(group) if group.pattern_name == record.pattern_name => {
                group.records.push(record);
            }
            _ => groups.push(MatchGroup {
                pattern_name: record.pattern_name.clone(),
                records: vec![record],
            }),
        }
    }
    groups
}
