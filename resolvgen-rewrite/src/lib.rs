// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Source indexing and merging for regenerated resolver files.
//!
//! The regeneration pass needs to know what already exists on disk before it
//! overwrites anything. This crate provides:
//!
//! - [`SourceIndex`] - every `*.rs` file of a set of directories, parsed once,
//!   one package per directory
//! - [`Session`] - lookups of previous declarations, tracking of which ones
//!   the regenerated output accounts for, and reconstruction of everything
//!   else so it can be carried over verbatim
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::load(["graph", "graph/users"])?;
//! let pkg = session.package("graph/users");
//!
//! let body = session.method_body(pkg, "", "CreateUser")?;
//! let imports = session.existing_imports(pkg, "graph/users/user.rs");
//! let leftover = session.remaining_source(pkg, "graph/users/user.rs")?;
//! ```

mod cache;
mod error;
mod index;
mod lines;
mod parse;
mod session;

pub use cache::SourceCache;
pub use error::{Error, Result};
pub use index::{
    DeclId, DeclKind, Declaration, FileId, Import, Package, PackageId, Position, SourceFile,
    SourceIndex, discover_dirs,
};
pub use session::Session;
