//! Source file discovery.
//!
//! Walks the target tree and picks out the JavaScript/TypeScript files
//! worth parsing, skipping vendored and generated directories.

pub mod walker;

pub use walker::find_source_files;
