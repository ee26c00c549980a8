mod counter;
mod extractor;
mod job;
mod types;
mod walker;

// Re-export the scanning API
pub use counter::ScanCounter;
pub use extractor::{BufferSource, Extractor};
pub use job::{ScanHandle, ScanJob};
pub use types::{MatchGroup, MatchRecord, ScanResult, ScanRoots};
pub use walker::Walker;

#[cfg(test)]
pub(crate) use job::sort_and_group;
