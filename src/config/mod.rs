use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Configuration for a single scan invocation.
///
/// Constructed once per scan and passed by reference into the components
/// that need it; there is no ambient global settings state. Compiled
/// pattern sets and path filters built from an unchanged config may be
/// reused across scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Annotation patterns, name to regex fragment. Each fragment must
    /// contain exactly one named capture group matching its key.
    pub patterns: BTreeMap<String, String>,

    /// Glob patterns for files to exclude from scanning
    pub exclude_files: Vec<String>,

    /// Glob patterns for directories to prune during traversal
    pub exclude_dirs: Vec<String>,

    /// Whether pattern matching is case sensitive
    pub case_sensitive: bool,

    /// Optional sort weight per pattern name (uppercase keys). Patterns
    /// without a weight sort by their own name after weighted ones.
    pub sort_weights: BTreeMap<String, String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let mut patterns = BTreeMap::new();
        patterns.insert(
            "TODO".to_string(),
            r"TODO[\s]*?:[\s]*(?P<TODO>.*)$".to_string(),
        );
        patterns.insert(
            "FIXME".to_string(),
            r"FIX ?ME[\s]*?:[\s]*(?P<FIXME>.*)$".to_string(),
        );
        patterns.insert(
            "NOTE".to_string(),
            r"NOTE[\s]*?:[\s]*(?P<NOTE>.*)$".to_string(),
        );
        patterns.insert(
            "CHANGED".to_string(),
            r"CHANGED[\s]*?:[\s]*(?P<CHANGED>.*)$".to_string(),
        );

        Self {
            patterns,
            exclude_files: Vec::new(),
            exclude_dirs: vec![
                "*.git*".to_string(),
                "*node_modules*".to_string(),
                "*.svn*".to_string(),
                "*.hg*".to_string(),
            ],
            case_sensitive: false,
            sort_weights: BTreeMap::new(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a TOML file, filling omitted fields
    /// with defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scan configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}
