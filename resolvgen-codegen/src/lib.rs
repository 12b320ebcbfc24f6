//! Resolver regeneration for resolvgen.
//!
//! Given the schema object model and a `[resolver]` configuration, the
//! [`Generator`] decides which file each resolver belongs in, recovers the
//! implementation written there last time, and re-renders every file with
//! hand-written code carried over.
//!
//! # Module Organization
//!
//! - [`Generator`] - planning, rendering and writing of resolver files
//! - [`Renderer`] / [`RustRenderer`] - turning a planned file into source
//! - [`Plugin`] / [`Implementer`] - default bodies for new resolvers
//! - [`PackageLoader`] - modules the root file starts depending on
//! - [`CodeBuilder`] - indented text building

mod code_builder;
mod generator;
mod imports;
mod output;
mod plugin;
mod render;

pub use code_builder::{CodeBuilder, Indent};
pub use generator::{
    GenerateResult, Generator, Plan, PreviewFile, accessor_name, container_name,
};
pub use imports::ImportCollector;
pub use output::{OutputFile, Resolver};
pub use plugin::{Implementer, PackageLoader, Plugin, RequiredPackages};
pub use render::{RenderOptions, Renderer, ResolverBuild, RustRenderer, Template};
