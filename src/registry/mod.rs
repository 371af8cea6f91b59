//! Registry verification.
//!
//! Probes candidate names against a package registry and classifies each
//! one as available, taken, timed out or errored.

pub mod npm;

pub use npm::RegistryChecker;
