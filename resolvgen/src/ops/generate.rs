//! Generate operation - resolver regeneration from the object model.

use std::path::Path;

use eyre::{Context, Result};
use resolvgen_codegen::{Generator, RequiredPackages};
use resolvgen_config::Config;
use resolvgen_ir::Schema;

use crate::reports::{GenerateReport, GenerationResult, PreviewFile, WrittenResult};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Directory the config paths are relative to.
    pub base_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
pub fn generate(config: &Config, schema: &Schema, opts: GenerateOptions) -> Result<GenerateReport> {
    let generator = Generator::new(config, schema).base_dir(opts.base_dir);
    let mut packages = RequiredPackages::new();

    let result = if opts.dry_run {
        let files = generator
            .preview(&mut packages)
            .wrap_err("Failed to plan resolver files")?
            .into_iter()
            .map(|f| PreviewFile {
                path: relative(opts.base_dir, &f.path),
                content: f.content,
            })
            .collect();
        GenerationResult::Preview(files)
    } else {
        let written = generator
            .generate(&mut packages)
            .wrap_err("Failed to generate resolvers")?;
        GenerationResult::Written(WrittenResult {
            written: written
                .written
                .iter()
                .map(|p| relative(opts.base_dir, p))
                .collect(),
            unchanged: written.unchanged.len(),
            skipped: written
                .skipped
                .iter()
                .map(|p| relative(opts.base_dir, p))
                .collect(),
        })
    };

    Ok(GenerateReport {
        configured: config.resolver.is_some(),
        resolver_count: schema.resolver_count(),
        packages: packages.paths().to_vec(),
        result,
    })
}

fn relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
