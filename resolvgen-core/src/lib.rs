//! Core utilities and types for the resolvgen resolver generator.
//!
//! This crate provides the file writing rules, identifier case helpers and
//! version type shared by the other resolvgen crates.

mod file;
mod utils;
mod version;

// File operations
pub use file::{File, FileRules, Overwrite, WriteResult};
// String utilities
pub use utils::{lc_first, to_snake_case, uc_first};
pub use version::Version;
