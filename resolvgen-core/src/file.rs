use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};

/// Outcome of [`File::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    /// The file already held exactly this content.
    Unchanged,
    /// The file exists and its rules forbid replacing it.
    Skipped,
}

/// When an existing file may be replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Regenerated files are replaced on every run.
    #[default]
    Always,
    /// Starting points are created once and then belong to the user.
    IfMissing,
}

#[derive(Debug, Clone, Default)]
pub struct FileRules {
    pub overwrite: Overwrite,
}

/// Rendered content bound for `path`.
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the content, creating parent directories as needed.
    pub fn write(&self) -> Result<WriteResult> {
        let exists = self
            .path
            .try_exists()
            .wrap_err_with(|| format!("failed to check '{}'", self.path.display()))?;
        if exists {
            match self.rules.overwrite {
                Overwrite::IfMissing => return Ok(WriteResult::Skipped),
                Overwrite::Always => {
                    if fs::read(&self.path).is_ok_and(|old| old == self.content.as_bytes()) {
                        return Ok(WriteResult::Unchanged);
                    }
                }
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create directory '{}'", parent.display()))?;
        }
        fs::write(&self.path, &self.content)
            .wrap_err_with(|| format!("failed to write '{}'", self.path.display()))?;
        Ok(WriteResult::Written)
    }
}
