//! confuscan - Dependency confusion scanner for local JS/TS source trees.
//!
//! This library provides tools for detecting dependency confusion exposure by:
//! - Walking a project tree for JavaScript and TypeScript sources
//! - Parsing them with AST to extract import specifiers
//! - Normalizing specifiers into canonical npm package names
//! - Checking whether each name is still claimable on the npm registry
//!
//! # Example
//!
//! ```no_run
//! use confuscan::scanner::Scanner;
//! use confuscan::config::ScanConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig {
//!         target_dir: "./my-app".into(),
//!         ..Default::default()
//!     };
//!     let scanner = Scanner::new(config).unwrap();
//!     let report = scanner.run().await.unwrap();
//!     println!("Found {} claimable names", report.available_count());
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod index;
pub mod parser;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::ScanConfig;
pub use scanner::Scanner;
pub use types::{
    ConfuscanError, ExtractionStats, PackageName, ProbeStatus, RawSpecifier, ReportEntry, Result,
    ScanReport, SpecifierKind, VerificationResult,
};
