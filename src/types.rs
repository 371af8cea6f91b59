//! Core types and errors for the dependency confusion scanner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during scanning.
#[derive(Error, Debug)]
pub enum ConfuscanError {
    #[error("directory does not exist: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("AST parse error: {0}")]
    AstParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfuscanError>;

/// The syntactic construct a specifier was lifted from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SpecifierKind {
    /// Static import declaration (import x from 'pkg').
    StaticImport,
    /// CommonJS require call (require('pkg')).
    Require,
    /// Dynamic import expression (import('pkg')).
    DynamicImport,
    /// Re-export with a source (export ... from 'pkg').
    ReExport,
}

/// A module specifier exactly as written in source, before classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RawSpecifier {
    /// The specifier text, unmodified.
    pub text: String,
    /// Where it appeared syntactically.
    pub kind: SpecifierKind,
}

/// Specifiers pulled out of a single source file, in document order.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Raw specifiers as written, duplicates included.
    pub specifiers: Vec<RawSpecifier>,
}

/// A canonical registry package name.
///
/// Only the specifier normalizer constructs these; holding one means the
/// text already passed classification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub(crate) fn new(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of probing one package name against the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    /// Registry returned 404: the name is unclaimed.
    Available,
    /// Registry returned a success response: the name exists.
    Taken,
    /// No response within the probe timeout.
    Timeout,
    /// Transport failure or an unexpected registry response.
    Error,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Available => "Available",
            ProbeStatus::Taken => "Taken",
            ProbeStatus::Timeout => "Timeout",
            ProbeStatus::Error => "Error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of verifying one candidate name.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// The probed name.
    pub name: PackageName,
    /// What the probe concluded.
    pub status: ProbeStatus,
    /// Detail for Timeout and Error outcomes.
    pub error: Option<String>,
}

/// Counters from the extraction phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Files parsed successfully.
    pub files_scanned: usize,
    /// Files skipped because they could not be read or parsed.
    pub files_skipped: usize,
    /// Raw specifiers seen across all parsed files.
    pub specifiers_extracted: usize,
}

/// One verified name with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Canonical package name.
    pub name: String,
    /// Probe outcome.
    pub status: ProbeStatus,
    /// Detail for Timeout and Error outcomes.
    pub error: Option<String>,
    /// Files that referenced the name, sorted.
    pub files: Vec<PathBuf>,
}

/// Complete result of one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Canonicalized scan root.
    pub root: PathBuf,
    /// Extraction phase counters.
    pub stats: ExtractionStats,
    /// Every verified name, sorted by name.
    pub entries: Vec<ReportEntry>,
    /// Scan duration in seconds.
    pub duration_secs: f64,
}

impl ScanReport {
    /// Entries whose name is unclaimed on the registry.
    pub fn available(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == ProbeStatus::Available)
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    /// Probes that did not produce a definitive answer.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, ProbeStatus::Timeout | ProbeStatus::Error))
            .count()
    }

    pub fn taken_count(&self) -> usize {
        self.entries.len() - self.available_count() - self.error_count()
    }
}
