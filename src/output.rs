//! Report rendering for disk usage analyses.
//!
//! Two forms are supported: the sectioned, human-readable listing printed by
//! the menu and the `analyze` subcommand, and a single JSON document emitted
//! when `--json` is passed.

use humansize::{BINARY, format_size};
use serde::Serialize;

use crate::config::AggregationMode;
use crate::utils::{Unit, format_in_unit};
use crate::walker::{DiskUsage, SizeEntry};

const SEPARATOR: &str = "---------------------------------------------------------------------------------------------------------";

/// Top-level JSON output emitted when `--json` is active.
#[derive(Serialize, Debug)]
pub struct JsonReport {
    /// The analyzed root path.
    pub root: String,

    /// Unit the `size_formatted` fields are expressed in.
    pub unit: String,

    /// `"recursive"` or `"direct"`.
    pub mode: &'static str,

    /// Directory entries in traversal order.
    pub directories: Vec<JsonEntry>,

    /// File entries in traversal order.
    pub files: Vec<JsonEntry>,

    /// Sum of all file sizes in bytes.
    pub total_size: u64,

    /// Human-readable total (e.g. `"1.5 MiB"`).
    pub total_size_formatted: String,

    /// Problems met during the walk.
    pub diagnostics: Vec<String>,
}

/// A single file or directory in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonEntry {
    /// Path as produced by the traversal.
    pub path: String,

    /// Size in bytes.
    pub size: u64,

    /// Size in the requested unit (e.g. `"1.000 KB"`).
    pub size_formatted: String,
}

impl JsonReport {
    /// Build a `JsonReport` from a finished walk.
    #[must_use]
    pub fn from_usage(usage: &DiskUsage, unit: Unit) -> Self {
        let total_size = usage.total_size();

        Self {
            root: usage.root.display().to_string(),
            unit: unit.label().to_string(),
            mode: match usage.aggregation {
                AggregationMode::Recursive => "recursive",
                AggregationMode::Direct => "direct",
            },
            directories: usage
                .directories
                .iter()
                .map(|e| JsonEntry::from_entry(e, unit))
                .collect(),
            files: usage
                .files
                .iter()
                .map(|e| JsonEntry::from_entry(e, unit))
                .collect(),
            total_size,
            total_size_formatted: format_size(total_size, BINARY),
            diagnostics: usage.diagnostics.clone(),
        }
    }
}

impl JsonEntry {
    /// Convert a `SizeEntry` into a `JsonEntry`.
    #[must_use]
    pub fn from_entry(entry: &SizeEntry, unit: Unit) -> Self {
        Self {
            path: entry.path.display().to_string(),
            size: entry.size,
            size_formatted: format_in_unit(entry.size, unit),
        }
    }
}

/// Render the sectioned listing of a walk in `unit`.
///
/// The output has a `Directories:` section followed by a `Files:` section,
/// each line reading `<path>: <size>`, and ends with the total.
#[must_use]
pub fn render_report(usage: &DiskUsage, unit: Unit) -> String {
    let mut lines = vec!["Converted file sizes in user chosen unit:".to_string()];

    lines.extend(section_lines("Directories: ", &usage.directories, unit));
    lines.extend(section_lines("Files: ", &usage.files, unit));
    lines.push(SEPARATOR.to_string());

    let total = usage.total_size();
    lines.push(format!(
        "Total: {} ({})",
        format_in_unit(total, unit),
        format_size(total, BINARY)
    ));

    join_lines(&lines)
}

/// Render the entries a walk could not read, one per line.
///
/// Returns an empty string when there is nothing to report.
#[must_use]
pub fn render_diagnostics(diagnostics: &[String]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!(
        "{} entries could not be read and were counted as 0 bytes:",
        diagnostics.len()
    )];
    lines.extend(diagnostics.iter().map(|d| format!("  {d}")));

    join_lines(&lines)
}

fn section_lines(title: &str, entries: &[SizeEntry], unit: Unit) -> Vec<String> {
    let header = [SEPARATOR.to_string(), title.to_string(), SEPARATOR.to_string()];
    let rows = entries.iter().map(|entry| {
        format!(
            "{}: {}",
            entry.path.display(),
            format_in_unit(entry.size, unit)
        )
    });

    header.into_iter().chain(rows).collect()
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
