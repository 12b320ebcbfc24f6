use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for source indexing (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Failures while loading or slicing previously generated sources.
///
/// None of these are recoverable: the run that hit one is aborted.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("cannot resolve directory '{dir}' as a source package")]
    #[diagnostic(
        code(resolvgen::directory_not_resolvable),
        help("check that the resolver filename in resolvgen.toml points inside an existing directory")
    )]
    DirectoryNotResolvable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}'")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {message}")]
    #[diagnostic(code(resolvgen::package_load))]
    PackageLoad {
        path: PathBuf,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    #[error("source span crosses files: starts in '{start}', ends in '{end}'")]
    SpanCrossesFiles { start: PathBuf, end: PathBuf },

    #[error("'{path}' does not belong to the package at '{package}'")]
    ForeignPosition { path: PathBuf, package: PathBuf },

    #[error("span {start}..{end} is out of bounds for '{path}'")]
    SpanOutOfBounds {
        path: PathBuf,
        start: usize,
        end: usize,
    },
}
