//! Check operation - config, model and resolver source validation.

use std::path::Path;

use eyre::Result;
use resolvgen_config::Config;
use resolvgen_ir::Schema;
use resolvgen_rewrite::{Error, SourceIndex, discover_dirs};
use tracing::debug;

use crate::reports::{CheckReport, PackageSummary};

/// Execute the check operation.
///
/// Loads every package under the resolver directory the same way a
/// regeneration would, so parse failures surface before anything is written.
pub fn check(
    config: &Config,
    config_path: &Path,
    schema: Option<&Schema>,
    base_dir: &Path,
) -> Result<CheckReport> {
    let mut report = CheckReport {
        config_path: config_path.to_path_buf(),
        errors: Vec::new(),
        warnings: Vec::new(),
        packages: Vec::new(),
        resolver_count: schema.map(Schema::resolver_count),
    };

    let Some(resolver) = &config.resolver else {
        report
            .warnings
            .push("no [resolver] section, generate will do nothing".to_string());
        return Ok(report);
    };

    if let Some(schema) = schema {
        for object in schema.all_objects() {
            for field in object.resolver_fields() {
                if field.position.src.is_empty() {
                    report.warnings.push(format!(
                        "{}.{} has no schema source, its resolver goes to the resolver root",
                        object.name, field.name
                    ));
                } else if !field.position.src.starts_with(&resolver.schema_dir) {
                    report.warnings.push(format!(
                        "{}.{} is declared in '{}', outside schema_dir '{}'",
                        object.name, field.name, field.position.src, resolver.schema_dir
                    ));
                }
            }
        }
    }

    let root = base_dir.join(resolver.dir());
    let dirs = match discover_dirs(&root) {
        Ok(dirs) => dirs,
        Err(err) => {
            report.errors.push(diagnostic(err));
            return Ok(report);
        }
    };
    debug!(root = %root.display(), dirs = dirs.len(), "checking resolver sources");

    let base = std::path::absolute(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
    match SourceIndex::load(&dirs) {
        Ok(index) => {
            report.packages = index
                .packages()
                .filter(|(_, package)| !package.files.is_empty())
                .map(|(_, package)| PackageSummary {
                    dir: package
                        .dir
                        .strip_prefix(&base)
                        .unwrap_or(&package.dir)
                        .to_path_buf(),
                    files: package.files.len(),
                    declarations: package
                        .files
                        .iter()
                        .map(|&file| index.file(file).items.len())
                        .sum(),
                })
                .collect();
        }
        Err(err) => report.errors.push(diagnostic(err)),
    }

    Ok(report)
}

/// Full rendering of a source error, with its code, help and source snippet.
fn diagnostic(err: Box<Error>) -> String {
    format!("{:?}", miette::Report::new(*err))
}
