use std::collections::{BTreeMap, HashSet};

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Priority value assigned when a note carries no parenthesized marker
pub const NO_PRIORITY: u8 = 100;

/// Matches a parenthesized one or two digit priority marker, e.g. `(5)`
static PRIORITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9]{1,2})\)").unwrap());

/// Finds named capture group declarations inside a pattern fragment
static CAPTURE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\?P?<([A-Za-z_][0-9A-Za-z_]*)>").unwrap());

/// Compiled set of annotation patterns.
///
/// All configured fragments are joined into one alternation so a line is
/// scanned in a single pass; which pattern matched is recovered through
/// its named capture group. Immutable after compile and safe to share
/// across scans while the configuration is unchanged.
#[derive(Debug)]
pub struct CompiledPatternSet {
    /// The combined alternation over every configured fragment
    combined: Regex,

    /// Pattern names in configuration order, used for capture lookup
    names: Vec<String>,
}

impl CompiledPatternSet {
    /// Compile the configured annotation patterns into one matcher.
    ///
    /// Fails if the map is empty, if a fragment does not declare a capture
    /// group named after its key, if a capture group name is declared by
    /// more than one fragment, or if the combined expression is invalid.
    pub fn compile(
        patterns: &BTreeMap<String, String>,
        case_sensitive: bool,
    ) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::EmptyPatterns);
        }

        let mut declared: HashSet<String> = HashSet::new();
        for (name, fragment) in patterns {
            let mut found_own = false;
            for caps in CAPTURE_NAME_RE.captures_iter(fragment) {
                let group = &caps[1];
                if !declared.insert(group.to_string()) {
                    return Err(ConfigError::DuplicateCaptureGroup {
                        name: group.to_string(),
                    });
                }
                if group == name {
                    found_own = true;
                }
            }
            if !found_own {
                return Err(ConfigError::MissingCaptureGroup { name: name.clone() });
            }
        }

        let alternation = patterns
            .values()
            .map(|fragment| format!("(?:{fragment})"))
            .collect::<Vec<_>>()
            .join("|");

        debug!(
            "Compiling {} annotation patterns (case_sensitive: {})",
            patterns.len(),
            case_sensitive
        );

        let combined = RegexBuilder::new(&alternation)
            .case_insensitive(!case_sensitive)
            .build()?;

        Ok(Self {
            combined,
            names: patterns.keys().cloned().collect(),
        })
    }

    /// Find every annotation occurrence in a line.
    ///
    /// Returns one `(pattern_name, note_text)` pair per participating
    /// named capture across all non-overlapping matches. A capture that
    /// matched the empty string still counts; a group that did not take
    /// part in the match does not.
    pub fn find_matches<'l>(&self, line: &'l str) -> Vec<(&str, &'l str)> {
        let mut found = Vec::new();
        for caps in self.combined.captures_iter(line) {
            for name in &self.names {
                if let Some(note) = caps.name(name) {
                    trace!("Matched {} with note: {}", name, note.as_str());
                    found.push((name.as_str(), note.as_str()));
                }
            }
        }
        found
    }

    /// Pattern names known to this set
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Extract the priority marker from a note's text.
    ///
    /// The first parenthesized one or two digit number wins; notes without
    /// one rank last with the sentinel value 100.
    pub fn priority(note: &str) -> u8 {
        PRIORITY_RE
            .captures(note)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(NO_PRIORITY)
    }
}
