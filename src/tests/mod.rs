use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::error::ConfigError;
use crate::filter::PathFilter;
use crate::pattern::{CompiledPatternSet, NO_PRIORITY};
use crate::scan::{MatchRecord, ScanCounter, sort_and_group};

fn patterns(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, fragment)| (name.to_string(), fragment.to_string()))
        .collect()
}

fn default_set() -> CompiledPatternSet {
    let config = crate::ScanConfig::default();
    CompiledPatternSet::compile(&config.patterns, config.case_sensitive)
        .expect("default patterns must compile")
}

#[test]
fn single_annotation_yields_one_match() {
    let set = default_set();
    let found = set.find_matches("# TODO: refactor this");
    assert_eq!(found, vec![("TODO", "refactor this")]);
}

#[test]
fn two_annotations_on_one_line_both_found() {
    let set = CompiledPatternSet::compile(
        &patterns(&[
            ("TODO", r"TODO:\s*(?P<TODO>[^N]*)"),
            ("NOTE", r"NOTE:\s*(?P<NOTE>.*)$"),
        ]),
        false,
    )
    .unwrap();

    let found = set.find_matches("TODO: x NOTE: y");
    assert_eq!(found.len(), 2);
    assert!(found.contains(&("TODO", "x ")));
    assert!(found.contains(&("NOTE", "y")));
}

#[test]
fn empty_capture_still_counts() {
    let set = default_set();
    let found = set.find_matches("// TODO:");
    assert_eq!(found, vec![("TODO", "")]);
}

#[test]
fn case_insensitive_by_default() {
    let set = default_set();
    let found = set.find_matches("# todo: lower case marker");
    assert_eq!(found, vec![("TODO", "lower case marker")]);
}

#[test]
fn case_sensitive_mode_ignores_lower_case() {
    let config = crate::ScanConfig::default();
    let set = CompiledPatternSet::compile(&config.patterns, true).unwrap();
    assert!(set.find_matches("# todo: lower case marker").is_empty());
    assert_eq!(
        set.find_matches("# TODO: upper"),
        vec![("TODO", "upper")]
    );
}

#[test]
fn empty_pattern_map_is_rejected() {
    let err = CompiledPatternSet::compile(&BTreeMap::new(), false).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyPatterns));
}

#[test]
fn fragment_without_own_capture_group_is_rejected() {
    let err =
        CompiledPatternSet::compile(&patterns(&[("TODO", r"TODO:\s*(.*)$")]), false).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCaptureGroup { name } if name == "TODO"));
}

#[test]
fn duplicate_capture_group_across_patterns_is_rejected() {
    let err = CompiledPatternSet::compile(
        &patterns(&[
            ("FIXME", r"FIXME:\s*(?P<FIXME>.*)$"),
            ("TODO", r"TODO:\s*(?P<FIXME>.*)$"),
        ]),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateCaptureGroup { name } if name == "FIXME"));
}

#[test]
fn malformed_fragment_is_rejected() {
    let err =
        CompiledPatternSet::compile(&patterns(&[("TODO", r"TODO(?P<TODO>[")]), false).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern(_)));
}

#[test_case("(5) fix this", 5; "leading marker")]
#[test_case("fix this", 100; "no marker")]
#[test_case("(99) edge", 99; "two digits")]
#[test_case("(abc)", 100; "non numeric")]
#[test_case("see (12) later", 12; "marker mid note")]
#[test_case("(100) too wide", 100; "three digits do not match")]
#[test_case("(3) then (7)", 3; "first marker wins")]
fn priority_extraction(note: &str, expected: u8) {
    assert_eq!(CompiledPatternSet::priority(note), expected);
}

#[test]
fn no_priority_sentinel_is_100() {
    assert_eq!(NO_PRIORITY, 100);
}

#[test]
fn directory_globs_match_anywhere_in_path() {
    let filter = PathFilter::compile(&[], &["*node_modules*".to_string()]).unwrap();
    assert!(filter.excludes_directory(Path::new("/repo/node_modules")));
    assert!(filter.excludes_directory(Path::new("/repo/node_modules/nested")));
    assert!(!filter.excludes_directory(Path::new("/repo/src")));
}

#[test]
fn file_globs_match_basename() {
    let filter = PathFilter::compile(&["*.min.js".to_string()], &[]).unwrap();
    assert!(filter.excludes_file(Path::new("/repo/dist/app.min.js")));
    assert!(!filter.excludes_file(Path::new("/repo/src/app.js")));
}

#[test]
fn question_mark_and_class_globs() {
    let filter = PathFilter::compile(
        &["temp?.log".to_string(), "cache[0-9]".to_string()],
        &[],
    )
    .unwrap();
    assert!(filter.excludes_file(Path::new("temp1.log")));
    assert!(filter.excludes_file(Path::new("/var/cache7")));
    assert!(!filter.excludes_file(Path::new("cachex")));
}

#[test]
fn empty_filter_excludes_nothing() {
    let filter = PathFilter::compile(&[], &[]).unwrap();
    assert!(!filter.excludes_file(Path::new("/any/file.rs")));
    assert!(!filter.excludes_directory(Path::new("/any/dir")));
}

fn record(pattern: &str, priority: u8, note: &str) -> MatchRecord {
    MatchRecord {
        filepath: Path::new("/tmp/a.py").to_path_buf(),
        line_number: 1,
        pattern_name: pattern.to_string(),
        note_text: note.to_string(),
        priority,
    }
}

#[test]
fn grouping_is_alphabetical_without_weights() {
    let groups = sort_and_group(
        vec![
            record("TODO", 100, "one"),
            record("FIXME", 100, "two"),
            record("TODO", 2, "three"),
        ],
        &BTreeMap::new(),
    );

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].pattern_name, "FIXME");
    assert_eq!(groups[1].pattern_name, "TODO");
    // Within a group, ascending priority
    assert_eq!(groups[1].records[0].note_text, "three");
    assert_eq!(groups[1].records[1].note_text, "one");
}

#[test]
fn weights_override_alphabetical_order() {
    let mut weights = BTreeMap::new();
    weights.insert("TODO".to_string(), "1".to_string());
    weights.insert("FIXME".to_string(), "2".to_string());

    let groups = sort_and_group(
        vec![record("FIXME", 100, "f"), record("TODO", 100, "t")],
        &weights,
    );

    assert_eq!(groups[0].pattern_name, "TODO");
    assert_eq!(groups[1].pattern_name, "FIXME");
}

#[test]
fn grouping_tolerates_no_records() {
    assert!(sort_and_group(Vec::new(), &BTreeMap::new()).is_empty());
}

#[test]
fn counter_is_exact_under_concurrent_increments() {
    let counter = Arc::new(ScanCounter::new());
    let mut workers = Vec::new();
    for _ in 0..8 {
        let counter = Arc::clone(&counter);
        workers.push(thread::spawn(move || {
            for _ in 0..1000 {
                counter.increment();
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(counter.value(), 8000);

    counter.reset();
    assert_eq!(counter.value(), 0);
}
