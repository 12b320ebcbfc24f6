//! Configuration types for resolvgen.toml.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Filename template used when `filename_template` is not configured.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{name}.rs";

/// Root configuration for resolvgen.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Skip the "Code generated by" notice at the top of generated files
    #[serde(default)]
    pub omit_file_notice: bool,

    /// Keep the notice but leave out the generator version
    #[serde(default)]
    pub omit_version_in_file_notice: bool,

    /// Resolver generation settings. Without it, nothing is generated.
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
}

/// How resolver implementations are laid out on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One root file plus one file per schema file, merged on every run
    #[default]
    FollowSchema,
    /// Everything in one file, generated only when it does not exist yet
    SingleFile,
}

/// The `[resolver]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Path of the root resolver file; its directory is the resolver root
    pub filename: PathBuf,

    /// Name of the root resolver type, also used as the container role suffix
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,

    /// Package name for the single-file layout (defaults to the directory name)
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub layout: Layout,

    /// Filename for per-schema files; `{name}` is replaced by the schema file stem
    #[serde(default)]
    pub filename_template: Option<String>,

    /// Prefix stripped from schema file paths before mirroring them
    #[serde(default)]
    pub schema_dir: String,

    /// Module path of the resolver root (e.g. `crate::graph`)
    #[serde(default = "default_import_path")]
    pub import_path: String,

    /// Type of the leading context parameter of every resolver
    #[serde(default = "default_context_type")]
    pub context_type: String,

    /// Skip the placeholder comments the templates add to undocumented resolvers
    #[serde(default)]
    pub omit_template_comment: bool,
}

fn default_type() -> String {
    "Resolver".to_string()
}

fn default_import_path() -> String {
    "crate".to_string()
}

fn default_context_type() -> String {
    "&Context".to_string()
}

impl ResolverConfig {
    /// A follow-schema resolver configuration rooted at `filename`.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            type_name: default_type(),
            package: None,
            layout: Layout::default(),
            filename_template: None,
            schema_dir: String::new(),
            import_path: default_import_path(),
            context_type: default_context_type(),
            omit_template_comment: false,
        }
    }

    /// Directory holding the root resolver file
    pub fn dir(&self) -> &Path {
        match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Configured package name, or the resolver directory name
    pub fn package_name(&self) -> String {
        self.package.clone().unwrap_or_else(|| {
            self.dir()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Filename template, falling back to [`DEFAULT_FILENAME_TEMPLATE`]
    pub fn filename_template(&self) -> &str {
        match self.filename_template.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_FILENAME_TEMPLATE,
        }
    }
}
