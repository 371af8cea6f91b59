//! Colored console output for scan results.

use crate::types::{ProbeStatus, ScanReport};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Console output handler with colors and formatting.
///
/// Everything here goes to stdout and is suppressed in JSON mode, where the
/// report itself is the only output.
pub struct ConsoleOutput {
    verbose: bool,
    json_mode: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, json_mode: bool) -> Self {
        Self { verbose, json_mode }
    }

    /// Print scan start message.
    pub fn print_scan_start(&self, root: &Path) {
        if self.json_mode {
            return;
        }

        let display = root.display().to_string();
        println!(
            "{} Scanning directory: {}",
            "[*]".bright_blue(),
            display.bright_white()
        );
    }

    /// Print scan progress (only in verbose mode).
    pub fn print_progress(&self, message: &str) {
        if self.json_mode || !self.verbose {
            return;
        }

        println!("{} {}", "[.]".dimmed(), message.dimmed());
    }

    /// Print info message.
    pub fn print_info(&self, message: &str) {
        if self.json_mode {
            return;
        }

        println!("{} {}", "[*]".bright_blue(), message);
    }

    /// Print an unprefixed notice line.
    pub fn print_notice(&self, message: &str) {
        if self.json_mode {
            return;
        }

        println!("{}", message);
    }

    /// Print the per-name status table.
    pub fn print_results_table(&self, report: &ScanReport) {
        if self.json_mode {
            return;
        }

        let width = report
            .entries
            .iter()
            .map(|e| e.name.len())
            .chain(std::iter::once("Package Name".len()))
            .max()
            .unwrap_or(12)
            + 2;

        println!();
        println!("{:<width$}Status", "Package Name");
        println!("{}-------", "-".repeat(width));

        for entry in &report.entries {
            let status = colored_status(entry.status);
            match &entry.error {
                Some(error) => {
                    println!("{:<width$}{} ({})", entry.name, status, error.dimmed())
                }
                None => println!("{:<width$}{}", entry.name, status),
            }
        }
    }

    /// Print scan summary, or the whole report as JSON in JSON mode.
    pub fn print_summary(&self, report: &ScanReport) {
        if self.json_mode {
            if let Ok(json) = serde_json::to_string_pretty(report) {
                println!("{}", json);
            }
            return;
        }

        println!();
        println!("Summary:");
        println!("- Total packages checked: {}", report.entries.len());
        println!("- Available: {}", report.available_count());
        println!("- Taken: {}", report.taken_count());
        println!("- Errors: {}", report.error_count());

        let available: Vec<&str> = report.available().map(|e| e.name.as_str()).collect();
        if !available.is_empty() {
            println!();
            println!(
                "{} {}",
                "Available package names:".red().bold(),
                available.join(", ")
            );
        }
    }

    /// Print where the report file landed.
    pub fn print_saved_to(&self, path: &Path) {
        if self.json_mode {
            return;
        }

        println!();
        println!(
            "{} Scan results saved to: {}",
            "[+]".green(),
            path.display()
        );
    }

    /// Create a progress bar.
    pub fn create_progress_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if self.json_mode {
            return None;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(message.to_string());
        Some(pb)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// Format a probe status with color. Available is the dangerous outcome.
fn colored_status(status: ProbeStatus) -> colored::ColoredString {
    match status {
        ProbeStatus::Available => "Available".red().bold(),
        ProbeStatus::Taken => "Taken".green(),
        ProbeStatus::Timeout => "Timeout".yellow(),
        ProbeStatus::Error => "Error".yellow(),
    }
}
