//! Recursive directory walker for scannable source files.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// File extensions that get parsed.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "cjs", "mjs"];

/// Entry names never worth descending into or parsing.
const SKIPPED_NAMES: &[&str] = &["node_modules", "dist", "build"];

/// Collect every scannable source file under `root`, sorted by path.
///
/// Entries named `node_modules`, `dist` or `build` and dot-prefixed entries
/// are skipped wholesale; the root itself is exempt, so an explicitly named
/// hidden directory still scans. Unreadable entries are logged and skipped.
pub fn find_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let location = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Unable to read {}: {}", location, err);
                continue;
            }
        };

        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}

fn is_skipped(entry: &DirEntry) -> bool {
    match entry.file_name().to_str() {
        Some(name) => SKIPPED_NAMES.contains(&name) || name.starts_with('.'),
        None => true,
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
