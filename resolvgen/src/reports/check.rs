//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from config and source validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Packages found under the resolver directory, in load order.
    pub packages: Vec<PackageSummary>,
    /// Fields needing a resolver, when a model was given.
    pub resolver_count: Option<usize>,
}

/// One loaded package.
#[derive(Debug)]
pub struct PackageSummary {
    pub dir: PathBuf,
    pub files: usize,
    pub declarations: usize,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));

        if let Some(count) = self.resolver_count {
            out.key_value("Resolvers", &count.to_string());
        }

        if !self.packages.is_empty() {
            out.newline();
            out.section(&format!("Packages ({})", self.packages.len()));
            for package in &self.packages {
                out.list_item(&format!(
                    "{} ({} files, {} declarations)",
                    package.dir.display(),
                    package.files,
                    package.declarations
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_render_valid() {
        let report = CheckReport {
            config_path: PathBuf::from("resolvgen.toml"),
            errors: Vec::new(),
            warnings: Vec::new(),
            packages: vec![PackageSummary {
                dir: PathBuf::from("graph"),
                files: 1,
                declarations: 4,
            }],
            resolver_count: Some(3),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            [
                "✓ resolvgen.toml is valid",
                "Resolvers: 3",
                "",
                "Packages (1):",
                "  - graph (1 files, 4 declarations)",
            ]
        );
    }

    #[test]
    fn test_render_errors_only() {
        let report = CheckReport {
            config_path: PathBuf::from("resolvgen.toml"),
            errors: vec!["failed to parse 'graph/resolver.rs'".to_string()],
            warnings: Vec::new(),
            packages: Vec::new(),
            resolver_count: None,
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(out.lines, ["error: failed to parse 'graph/resolver.rs'"]);
    }
}
