use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::scan::ScanHandle;

/// Spinner that follows a running scan by polling its counter.
///
/// Strictly read-only toward the scan: it observes whatever counter value
/// is current at each tick and may miss intermediate values.
#[derive(Debug)]
pub struct ProgressReporter {
    /// Delay between counter polls
    interval: Duration,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

impl ProgressReporter {
    /// Create a reporter with the default poll interval
    pub fn new() -> Self {
        Self::default()
    }

    /// Display a spinner until the scan finishes, then clear it
    pub fn watch(&self, handle: &ScanHandle) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );

        let counter = handle.counter();
        while !handle.is_finished() {
            spinner.set_message(format!("{} files scanned", counter.value()));
            spinner.tick();
            thread::sleep(self.interval);
        }

        debug!("Scan finished after {} files", counter.value());
        spinner.finish_and_clear();
    }
}
