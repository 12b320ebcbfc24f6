//! Generate command report data structures.

use super::output::{Output, Report};

/// Report data from resolver generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Whether resolvgen.toml has a `[resolver]` section.
    pub configured: bool,
    /// Number of fields needing a resolver.
    pub resolver_count: usize,
    /// Module paths the root resolver file now imports.
    pub packages: Vec<String>,
    pub result: GenerationResult,
}

#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// Result when files were written to disk.
#[derive(Debug, Default)]
pub struct WrittenResult {
    pub written: Vec<String>,
    /// Number of files already up to date.
    pub unchanged: usize,
    pub skipped: Vec<String>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if !self.configured {
            out.warning("no [resolver] section in config, nothing generated");
            return;
        }

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(files) => Self::render_preview(out, files),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.key_value("Resolvers", &self.resolver_count.to_string());

        if written.unchanged > 0 {
            out.key_value("Up to date", &written.unchanged.to_string());
        }

        if written.written.is_empty() {
            out.preformatted("Nothing to write");
        } else {
            out.newline();
            out.section(&format!("Written ({})", written.written.len()));
            for path in &written.written {
                out.added_item(path);
            }
        }

        for path in &written.skipped {
            out.warning(&format!("{path} already exists, left unchanged"));
        }

        if !self.packages.is_empty() {
            out.newline();
            out.section("Imported packages");
            for package in &self.packages {
                out.list_item(package);
            }
        }
    }

    fn render_preview(out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}
