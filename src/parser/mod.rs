//! Specifier extraction and classification.
//!
//! Extraction pulls raw module specifiers out of JavaScript/TypeScript
//! syntax trees; classification reduces them to canonical registry package
//! names, rejecting everything a registry probe could never answer for
//! (relative paths, runtime built-ins, URLs).

pub mod ast_parser;

pub use ast_parser::AstParser;

use crate::types::{PackageName, RawSpecifier, Result};
use std::path::Path;

/// Capability to pull import specifiers out of one source text.
///
/// The scanner drives extraction through this trait; [`AstParser`] is the
/// default implementation.
pub trait SourceParser: Send + Sync {
    /// Extract every import specifier in `source`, in document order.
    ///
    /// `path` selects the dialect (TypeScript, JSX) and appears in
    /// diagnostics. Unparseable source is an error; the caller decides
    /// whether that skips the file or aborts.
    fn parse(&self, source: &str, path: &Path) -> Result<Vec<RawSpecifier>>;
}

/// Classify a raw import specifier into a canonical registry package name.
///
/// Returns `None` for anything that cannot name a registry package:
/// relative and absolute paths, Node built-ins, URLs, and specifiers whose
/// canonical form fails the registry name grammar. Deterministic and
/// idempotent: a surviving canonical name normalizes to itself.
pub fn normalize_specifier(raw: &str) -> Option<PackageName> {
    let trimmed = raw.trim();

    // Skip empty names
    if trimmed.is_empty() {
        return None;
    }

    // Skip relative and absolute imports
    if trimmed.starts_with('.') || trimmed.starts_with('/') {
        return None;
    }

    // Skip runtime built-ins (node:-prefixed or bare)
    if trimmed.starts_with("node:") || is_node_builtin(trimmed) {
        return None;
    }

    // Skip URLs and Windows drive-letter paths
    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("file://")
        || has_drive_letter_prefix(trimmed)
    {
        return None;
    }

    let canonical = reduce_to_canonical(trimmed)?;

    // Deep imports of built-ins (fs/promises) only surface after reduction
    if is_node_builtin(&canonical) {
        return None;
    }

    if !is_valid_canonical_name(&canonical) {
        return None;
    }

    Some(PackageName::new(canonical))
}

/// Reduce a specifier to the package it resolves against: scope plus name
/// for scoped specifiers, the first segment for deep imports.
fn reduce_to_canonical(specifier: &str) -> Option<String> {
    // Scoped packages (@scope/name/subpath) keep the first two segments
    if let Some(rest) = specifier.strip_prefix('@') {
        let parts: Vec<&str> = rest.splitn(3, '/').collect();
        if parts.len() < 2 {
            return None;
        }
        return Some(format!("@{}/{}", parts[0], parts[1]));
    }

    match specifier.matches('/').count() {
        // Plain package name
        0 => Some(specifier.to_string()),
        // Deep import like lodash/map
        1 => specifier.split('/').next().map(str::to_string),
        // Two or more separators is a path, not a package
        _ => None,
    }
}

/// Check if a name is a Node.js built-in module.
fn is_node_builtin(name: &str) -> bool {
    const BUILTINS: &[&str] = &[
        "assert",
        "async_hooks",
        "buffer",
        "child_process",
        "cluster",
        "console",
        "constants",
        "crypto",
        "dgram",
        "diagnostics_channel",
        "dns",
        "domain",
        "events",
        "fs",
        "http",
        "http2",
        "https",
        "inspector",
        "module",
        "net",
        "os",
        "path",
        "perf_hooks",
        "process",
        "punycode",
        "querystring",
        "readline",
        "repl",
        "stream",
        "string_decoder",
        "sys",
        "timers",
        "tls",
        "trace_events",
        "tty",
        "url",
        "util",
        "v8",
        "vm",
        "wasi",
        "worker_threads",
        "zlib",
    ];

    BUILTINS.contains(&name)
}

fn has_drive_letter_prefix(specifier: &str) -> bool {
    let bytes = specifier.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Validate a canonical name against the registry grammar.
fn is_valid_canonical_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 214 {
        return false;
    }

    // Scoped form: @scope/name, both segments follow the grammar
    if let Some(rest) = name.strip_prefix('@') {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 2 {
            return false;
        }
        return is_valid_segment(parts[0]) && is_valid_segment(parts[1]);
    }

    !name.contains('/') && is_valid_segment(name)
}

/// One name segment: a leading alphanumeric, then alphanumerics plus
/// `.`, `_` and `-`. Uppercase is allowed (legacy registry names).
fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}
