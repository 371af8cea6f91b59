//! Main scanner orchestrating discovery, extraction and verification.

use crate::config::ScanConfig;
use crate::discovery::find_source_files;
use crate::index::OccurrenceIndex;
use crate::parser::{normalize_specifier, AstParser, SourceParser};
use crate::registry::RegistryChecker;
use crate::report::{build_report, write_report, ConsoleOutput};
use crate::types::{
    ConfuscanError, ExtractionStats, FileExtraction, PackageName, Result, ScanReport,
    VerificationResult,
};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Files read and parsed concurrently during extraction.
const FILE_CONCURRENCY: usize = 16;

/// Main scanner tying the pipeline together.
pub struct Scanner {
    config: ScanConfig,
    parser: Arc<dyn SourceParser>,
    checker: RegistryChecker,
    console: ConsoleOutput,
}

impl Scanner {
    /// Create a new scanner with the given configuration.
    pub fn new(config: ScanConfig) -> Result<Self> {
        let checker = RegistryChecker::new(&config)?;
        let console = ConsoleOutput::new(config.verbose, config.json);

        Ok(Self {
            config,
            parser: Arc::new(AstParser::new()),
            checker,
            console,
        })
    }

    /// Swap in a different parser backend.
    pub fn with_parser(mut self, parser: Arc<dyn SourceParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Run the full scan pipeline and persist the report.
    pub async fn run(&self) -> Result<ScanReport> {
        let start_time = Instant::now();

        let root = self.validate_root()?;
        self.console.print_scan_start(&root);

        // Step 1: enumerate source files
        let files = find_source_files(&root);
        if files.is_empty() {
            self.console.print_notice("No source files found.");
            return self
                .finish(
                    root,
                    ExtractionStats::default(),
                    OccurrenceIndex::new(),
                    Vec::new(),
                    start_time,
                )
                .await;
        }
        self.console
            .print_info(&format!("Found {} files to analyze", files.len()));

        // Step 2: extract specifiers and classify them into candidates
        self.console
            .print_progress(&format!("Parsing {} files in parallel...", files.len()));
        let (index, stats) = self.extract_all(files).await;
        if stats.files_skipped > 0 {
            self.console.print_progress(&format!(
                "Skipped {} files that could not be read or parsed",
                stats.files_skipped
            ));
        }
        self.console.print_info(&format!(
            "Extracted {} import statements",
            stats.specifiers_extracted
        ));

        if index.is_empty() {
            self.console.print_notice("No package names found to check.");
            return self.finish(root, stats, index, Vec::new(), start_time).await;
        }
        self.console.print_info(&format!(
            "Found {} package candidates to check",
            index.len()
        ));

        // Step 3: verify candidates against the registry
        self.console.print_info("Checking package availability...");
        let names: Vec<PackageName> = index.names().cloned().collect();
        let pb = self
            .console
            .create_progress_bar(names.len() as u64, "Checking registry");

        let results = self
            .checker
            .verify_all(&names, |result| {
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                debug!("{}: {}", result.name, result.status);
            })
            .await;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        self.finish(root, stats, index, results, start_time).await
    }

    /// Canonicalize and validate the target directory.
    ///
    /// Runs before anything is written, so a bad root never leaves a
    /// partial report behind.
    fn validate_root(&self) -> Result<PathBuf> {
        let root = self
            .config
            .target_dir
            .canonicalize()
            .map_err(|_| ConfuscanError::InvalidRoot(self.config.target_dir.clone()))?;

        if !root.is_dir() {
            return Err(ConfuscanError::InvalidRoot(self.config.target_dir.clone()));
        }

        Ok(root)
    }

    /// Read, parse and classify every file, merging into one index.
    ///
    /// Merge order does not matter: the index is a set union keyed by
    /// name, so completion order of the concurrent extractions is free to
    /// vary.
    async fn extract_all(&self, files: Vec<PathBuf>) -> (OccurrenceIndex, ExtractionStats) {
        let extractions: Vec<Option<FileExtraction>> = stream::iter(files)
            .map(|path| {
                let parser = Arc::clone(&self.parser);
                async move { extract_file(parser, path).await }
            })
            .buffer_unordered(FILE_CONCURRENCY)
            .collect()
            .await;

        let mut index = OccurrenceIndex::new();
        let mut stats = ExtractionStats::default();

        for extraction in extractions {
            match extraction {
                Some(extraction) => {
                    stats.files_scanned += 1;
                    stats.specifiers_extracted += extraction.specifiers.len();
                    for specifier in &extraction.specifiers {
                        if let Some(name) = normalize_specifier(&specifier.text) {
                            index.record(name, extraction.path.clone());
                        }
                    }
                }
                None => stats.files_skipped += 1,
            }
        }

        (index, stats)
    }

    /// Assemble, print and persist the report.
    async fn finish(
        &self,
        root: PathBuf,
        stats: ExtractionStats,
        index: OccurrenceIndex,
        results: Vec<VerificationResult>,
        start_time: Instant,
    ) -> Result<ScanReport> {
        let duration = start_time.elapsed().as_secs_f64();
        let report = build_report(root, stats, results, &index, duration);

        if !report.entries.is_empty() {
            self.console.print_results_table(&report);
        }
        self.console.print_summary(&report);

        write_report(&report, &self.config.output_file).await?;
        self.console.print_saved_to(&self.config.output_file);

        Ok(report)
    }
}

/// Extract specifiers from one file.
///
/// Returns None when the file had to be skipped; unreadable or unparseable
/// files never abort the scan.
async fn extract_file(parser: Arc<dyn SourceParser>, path: PathBuf) -> Option<FileExtraction> {
    let source = match tokio::fs::read_to_string(&path).await {
        Ok(source) => source,
        Err(e) => {
            warn!("Cannot read file {}: {}", path.display(), e);
            return None;
        }
    };

    match parser.parse(&source, &path) {
        Ok(specifiers) => Some(FileExtraction { path, specifiers }),
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}
