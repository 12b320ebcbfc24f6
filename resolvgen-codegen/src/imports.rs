//! Import collection for generated files.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use resolvgen_rewrite::Import;

/// Deduplicated `use` declarations for one generated file.
///
/// Paths keep insertion order; aliases of one path are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportCollector {
    /// Path -> aliases ("" for a plain import)
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `use {path};`, or `use {path} as {alias};` for a non-empty alias.
    pub fn add(&mut self, alias: &str, path: &str) {
        self.imports
            .entry(path.to_string())
            .or_default()
            .insert(alias.to_string());
    }

    pub fn extend(&mut self, imports: impl IntoIterator<Item = Import>) {
        for import in imports {
            self.add(&import.alias, &import.path);
        }
    }

    pub fn has(&self, alias: &str, path: &str) -> bool {
        self.imports
            .get(path)
            .is_some_and(|aliases| aliases.contains(alias))
    }

    /// Iterate as `(alias, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imports.iter().flat_map(|(path, aliases)| {
            aliases
                .iter()
                .map(move |alias| (alias.as_str(), path.as_str()))
        })
    }

    /// Render one `use` line per import.
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|(alias, path)| {
                if alias.is_empty() {
                    format!("use {path};")
                } else {
                    format!("use {path} as {alias};")
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imports.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_order() {
        let mut imports = ImportCollector::new();
        imports.add("mod2", "crate::graph::posts");
        imports.add("mod1", "crate::graph::users");
        imports.add("mod2", "crate::graph::posts");

        assert_eq!(imports.len(), 2);
        assert_eq!(
            imports.lines(),
            [
                "use crate::graph::posts as mod2;",
                "use crate::graph::users as mod1;"
            ]
        );
    }

    #[test]
    fn test_extend_from_existing() {
        let mut imports = ImportCollector::new();
        imports.extend([
            Import::new("", "std::fmt"),
            Import::new("Model", "crate::models::User"),
        ]);

        assert!(imports.has("", "std::fmt"));
        assert!(imports.has("Model", "crate::models::User"));
        assert!(!imports.has("", "crate::models::User"));
        assert_eq!(
            imports.lines(),
            ["use std::fmt;", "use crate::models::User as Model;"]
        );
    }
}
