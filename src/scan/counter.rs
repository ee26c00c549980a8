use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe count of files attempted during a scan.
///
/// Incremented by the extraction worker and polled by the progress
/// display; increments are never lost under concurrent access. Each scan
/// job owns its own counter, so concurrent jobs never interfere.
#[derive(Debug, Default)]
pub struct ScanCounter {
    count: AtomicUsize,
}

impl ScanCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempted file, returning the new count
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current count snapshot
    pub fn value(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the count to zero
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}
