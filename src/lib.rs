pub mod config;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod report;
pub mod scan;

#[cfg(test)]
mod tests;

// Re-export main types and functions for easier access
pub use config::ScanConfig;
pub use error::ConfigError;
pub use filter::PathFilter;
pub use pattern::{CompiledPatternSet, NO_PRIORITY};
pub use scan::{
    BufferSource, Extractor, MatchGroup, MatchRecord, ScanCounter, ScanHandle, ScanJob,
    ScanResult, ScanRoots, Walker,
};
