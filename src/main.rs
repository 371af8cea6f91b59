//! confuscan - Dependency confusion scanner for local JS/TS source trees.
//!
//! CLI entry point.

use clap::error::ErrorKind;
use clap::Parser;
use confuscan::{ScanConfig, Scanner};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ScanConfig::try_parse() {
        Ok(config) => config,
        Err(e) => {
            // Help and version requests exit clean, usage errors do not
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = e.print();
            return code;
        }
    };

    // Set up logging on stderr so stdout stays a clean report stream
    let filter = if config.verbose {
        EnvFilter::new("confuscan=debug,info")
    } else {
        EnvFilter::new("confuscan=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let scanner = match Scanner::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create scanner: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match scanner.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Scan failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
