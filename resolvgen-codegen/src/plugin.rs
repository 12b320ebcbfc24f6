//! Extension points consulted during regeneration.

use resolvgen_ir::{Field, Object};

/// A plugin registered with the [`Generator`](crate::Generator).
///
/// Plugins are consulted in registration order.
pub trait Plugin {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Body synthesizer this plugin provides, if any.
    ///
    /// The first plugin that returns one is used for every resolver that
    /// has no previous implementation.
    fn implementer(&self) -> Option<&dyn Implementer> {
        None
    }
}

/// Produces the body of a resolver that was never implemented.
///
/// The returned text is inserted as-is.
pub trait Implementer {
    fn implement(&self, object: &Object, field: &Field) -> String;
}

/// Receives module paths the generated root file depends on.
pub trait PackageLoader {
    fn load(&mut self, import_path: &str);
}

/// [`PackageLoader`] that records every path it is given, once.
#[derive(Debug, Clone, Default)]
pub struct RequiredPackages {
    paths: Vec<String>,
}

impl RequiredPackages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl PackageLoader for RequiredPackages {
    fn load(&mut self, import_path: &str) {
        if !self.paths.iter().any(|p| p == import_path) {
            self.paths.push(import_path.to_string());
        }
    }
}
