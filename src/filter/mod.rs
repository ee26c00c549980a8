use std::path::Path;

use log::trace;
use regex::Regex;

use crate::error::ConfigError;

/// Compiled exclusion rules for paths encountered during a scan.
///
/// Two independent rule sets exist: one applied to directories while
/// traversing (pruning whole subtrees) and one applied to candidate
/// files. Globs are translated to regular expressions and matched with
/// search semantics, so a pattern matching any part of the path or its
/// basename excludes it.
#[derive(Debug, Default)]
pub struct PathFilter {
    /// Rules applied to candidate file paths
    file_rules: Vec<Regex>,

    /// Rules applied to directory paths during traversal
    dir_rules: Vec<Regex>,
}

impl PathFilter {
    /// Compile file and directory exclusion globs into matchers
    pub fn compile(
        file_patterns: &[String],
        dir_patterns: &[String],
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            file_rules: compile_rules(file_patterns)?,
            dir_rules: compile_rules(dir_patterns)?,
        })
    }

    /// Whether traversal should prune this directory and everything
    /// beneath it
    pub fn excludes_directory(&self, path: impl AsRef<Path>) -> bool {
        let excluded = matches_any(&self.dir_rules, path.as_ref());
        if excluded {
            trace!("Excluding directory: {}", path.as_ref().display());
        }
        excluded
    }

    /// Whether this file should be dropped from the candidate set
    pub fn excludes_file(&self, path: impl AsRef<Path>) -> bool {
        let excluded = matches_any(&self.file_rules, path.as_ref());
        if excluded {
            trace!("Excluding file: {}", path.as_ref().display());
        }
        excluded
    }
}

fn compile_rules(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&glob_to_regex(pattern)).map_err(|source| ConfigError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn matches_any(rules: &[Regex], path: &Path) -> bool {
    if rules.is_empty() {
        return false;
    }
    let full = path.to_string_lossy();
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    rules
        .iter()
        .any(|rule| rule.is_match(&full) || rule.is_match(&base))
}

/// Translate a glob pattern into an unanchored regular expression,
/// fnmatch style: `*` matches any run of characters, `?` any single
/// character, `[...]` a character class (`[!...]` negated). An unclosed
/// bracket is taken literally.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '!' || chars[j] == ']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str(r"\[");
                } else {
                    let inner: String = chars[i + 1..j].iter().collect();
                    out.push('[');
                    if let Some(rest) = inner.strip_prefix('!') {
                        out.push('^');
                        out.push_str(&rest.replace('\\', r"\\"));
                    } else {
                        out.push_str(&inner.replace('\\', r"\\"));
                    }
                    out.push(']');
                    i = j;
                }
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out
}
