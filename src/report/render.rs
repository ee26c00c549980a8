use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::scan::{MatchRecord, ScanResult};

/// Presentation options for the plain-text report
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include trailing folder segments ahead of the file name
    pub include_folder: bool,

    /// How many trailing folder segments to include
    pub folder_depth: usize,

    /// Cap on the column width reserved for file locations
    pub max_align: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_folder: false,
            folder_depth: 1,
            max_align: 50,
        }
    }
}

/// Render a scan result as a plain-text review report: a header line with
/// date, file count and elapsed time, then one `## NAME (n)` section per
/// group with numbered, column-aligned `file:line  note` rows.
pub fn render_text(result: &ScanResult, options: &RenderOptions) -> String {
    let date = Local::now().format("%A %m/%d/%y at %I:%M%p");
    let mut out = format!(
        "// {} - {} files in {:.2} secs\n",
        date, result.files_scanned, result.elapsed_secs
    );

    let align = location_column_width(result, options);

    for group in &result.groups {
        out.push_str(&format!(
            "\n## {} ({})\n",
            group.pattern_name.to_uppercase(),
            group.records.len()
        ));
        for (index, record) in group.records.iter().enumerate() {
            let line = format!("{}. {}", index + 1, draw_location(record, options));
            let padding = " ".repeat(align.saturating_sub(line.len()).max(1));
            out.push_str(&format!("{}{}{}\n", line, padding, record.note_text));
        }
    }

    out
}

/// Render a scan result as pretty-printed JSON
pub fn render_json(result: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize scan result")
}

/// Column width for locations: the longest rendered location, capped,
/// plus room for the row index and a gap
fn location_column_width(result: &ScanResult, options: &RenderOptions) -> usize {
    let largest = result
        .groups
        .iter()
        .flat_map(|group| &group.records)
        .map(|record| draw_location(record, options).len())
        .max()
        .unwrap_or(0);
    largest.min(options.max_align) + 6
}

/// Render a record's location as `file:line`, optionally keeping the
/// trailing folder segments of its path
fn draw_location(record: &MatchRecord, options: &RenderOptions) -> String {
    let name = if options.include_folder {
        trailing_segments(&record.filepath, options.folder_depth)
    } else {
        record
            .filepath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.filepath.display().to_string())
    };
    format!("{}:{}", name, record.line_number)
}

fn trailing_segments(path: &Path, depth: usize) -> String {
    let segments: Vec<String> = path
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();
    let keep = depth + 1; // folders plus the file name itself
    let start = segments.len().saturating_sub(keep);
    segments[start..].join("/")
}
