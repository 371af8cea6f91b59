//! Report assembly and persistence.
//!
//! Joins verification results with file provenance into a [`ScanReport`],
//! renders the available-package table and writes it to disk.

pub mod console;

pub use console::ConsoleOutput;

use crate::index::OccurrenceIndex;
use crate::types::{ExtractionStats, ReportEntry, Result, ScanReport, VerificationResult};
use std::path::{Path, PathBuf};

/// Join verification results with their provenance into a report.
///
/// Entries come out sorted by name. Every verified name is expected to be
/// present in the index; provenance is what made it a candidate.
pub fn build_report(
    root: PathBuf,
    stats: ExtractionStats,
    results: Vec<VerificationResult>,
    index: &OccurrenceIndex,
    duration_secs: f64,
) -> ScanReport {
    let mut entries: Vec<ReportEntry> = results
        .into_iter()
        .map(|result| {
            let files = index.files_for(&result.name);
            debug_assert!(
                !files.is_empty(),
                "verified name without provenance: {}",
                result.name
            );
            ReportEntry {
                name: result.name.into_string(),
                status: result.status,
                error: result.error,
                files,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    ScanReport {
        root,
        stats,
        entries,
        duration_secs,
    }
}

/// Render the persisted report: one row per available name and file pair.
///
/// A scan that found nothing available still renders an explicit line, so
/// an empty report file is distinguishable from a scan that never ran.
pub fn render_report(report: &ScanReport) -> String {
    let mut rows: Vec<(&str, String)> = Vec::new();
    for entry in report.available() {
        for file in &entry.files {
            rows.push((entry.name.as_str(), file.display().to_string()));
        }
    }

    if rows.is_empty() {
        return "No available packages found.\n".to_string();
    }

    let name_width = rows
        .iter()
        .map(|(name, _)| name.len())
        .chain(std::iter::once("Package Name".len()))
        .max()
        .unwrap_or(0);
    let path_width = rows
        .iter()
        .map(|(_, path)| path.len())
        .chain(std::iter::once("File Path".len()))
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    table.push_str(&format!(
        "{:<name_width$} | {:<path_width$}\n",
        "Package Name", "File Path"
    ));
    table.push_str(&format!(
        "{}-|-{}\n",
        "-".repeat(name_width),
        "-".repeat(path_width)
    ));
    for (name, path) in &rows {
        table.push_str(&format!("{:<name_width$} | {}\n", name, path));
    }

    table
}

/// Persist the rendered report to `path`.
pub async fn write_report(report: &ScanReport, path: &Path) -> Result<()> {
    let rendered = render_report(report);
    tokio::fs::write(path, rendered).await?;
    Ok(())
}
