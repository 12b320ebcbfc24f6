//! Core operations.
//!
//! This module contains the business logic for resolvgen commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use resolvgen_ir::Schema;

pub use check::check;
pub use generate::{GenerateOptions, generate};

/// Read the object model written by the schema compiler.
pub fn load_model(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read model '{}'", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("failed to parse model '{}'", path.display()))
}

/// Directory that paths in the config file are relative to.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir(Path::new("resolvgen.toml")), Path::new("."));
        assert_eq!(
            base_dir(Path::new("api/resolvgen.toml")),
            Path::new("api")
        );
    }

    #[test]
    fn test_load_model() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"objects": [{"name": "Query", "fields": [
                {"name": "user", "member_name": "User", "is_resolver": true,
                 "args": [{"name": "id", "type": "String"}],
                 "position": {"src": "schema.graphql"}}
            ]}]}"#,
        )
        .unwrap();

        let schema = load_model(&path).unwrap();
        assert_eq!(schema.objects[0].name, "Query");
        assert_eq!(schema.resolver_count(), 1);
        assert!(schema.inputs.is_empty());
    }

    #[test]
    fn test_load_model_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(err.to_string().contains("model.json"));
    }
}
