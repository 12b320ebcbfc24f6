// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Configuration for the resolvgen resolver generator.
//!
//! Parses `resolvgen.toml`, validates it, and reports problems as
//! [`miette`] diagnostics pointing into the configuration source.

mod config;
mod error;
mod parse;
mod validate;

pub use config::{Config, DEFAULT_FILENAME_TEMPLATE, Layout, ResolverConfig};
pub use error::{Error, Result};
pub use parse::parse_config;
