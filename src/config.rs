//! Configuration handling for the scanner.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Dependency confusion scanner for local JavaScript/TypeScript source trees.
#[derive(Parser, Debug, Clone)]
#[command(name = "confuscan")]
#[command(author, version, about, long_about = None)]
pub struct ScanConfig {
    /// Directory to scan for source files
    pub target_dir: PathBuf,

    /// File the available-package report is written to
    #[arg(default_value = "available-packages.txt")]
    pub output_file: PathBuf,

    /// Registry base URL to probe
    #[arg(
        long,
        env = "CONFUSCAN_REGISTRY",
        default_value = "https://registry.npmjs.org"
    )]
    pub registry: String,

    /// Names probed concurrently per batch
    #[arg(long, default_value = "3")]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[arg(long, default_value = "200")]
    pub batch_delay_ms: u64,

    /// Per-probe timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
            output_file: PathBuf::from("available-packages.txt"),
            registry: "https://registry.npmjs.org".to_string(),
            batch_size: 3,
            batch_delay_ms: 200,
            timeout: 10,
            json: false,
            verbose: false,
        }
    }
}

impl ScanConfig {
    /// Delay inserted between verification batches.
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Hard deadline for a single registry probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
