//! Planned output files and the resolvers they contain.

use std::path::{Path, PathBuf};

use resolvgen_ir::Field;
use resolvgen_rewrite::DeclId;

use crate::{ImportCollector, Template};

/// One resolver implementation to render.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Schema object owning the field
    pub object: String,
    pub field: Field,
    /// Container type the resolver is a method of; `None` for a free function
    pub container: Option<String>,
    /// Declaration this resolver replaces, if it existed before
    pub prev: Option<DeclId>,
    /// Doc comment text without comment markers
    pub comment: String,
    /// Outer attributes carried over from `prev`, as written
    pub attrs: Vec<String>,
    /// Body text without braces
    pub body: String,
}

impl Resolver {
    pub fn member(&self) -> &str {
        &self.field.member_name
    }

    pub fn is_method(&self) -> bool {
        self.container.is_some()
    }
}

/// Everything that goes into one generated file.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub template: Template,
    /// Objects whose container type is declared in this file, by name
    pub objects: Vec<String>,
    pub resolvers: Vec<Resolver>,
    pub imports: ImportCollector,
    /// Inner attributes of the previous version, as written
    pub inner_attrs: Vec<String>,
    /// Hand-written source carried over from the previous version
    pub leftover: String,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, template: Template) -> Self {
        Self {
            path: path.into(),
            template,
            objects: Vec::new(),
            resolvers: Vec::new(),
            imports: ImportCollector::new(),
            inner_attrs: Vec::new(),
            leftover: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the directory holding this file.
    pub fn package_name(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub(crate) fn add_object(&mut self, name: &str) {
        if !self.objects.iter().any(|o| o == name) {
            self.objects.push(name.to_string());
        }
    }

    /// Resolvers rendered as methods of `object`'s container.
    pub fn methods_of<'a>(&'a self, object: &'a str) -> impl Iterator<Item = &'a Resolver> {
        self.resolvers
            .iter()
            .filter(move |r| r.is_method() && r.object == object)
    }

    /// Resolvers rendered as free functions.
    pub fn functions(&self) -> impl Iterator<Item = &Resolver> {
        self.resolvers.iter().filter(|r| !r.is_method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(object: &str, member: &str, container: Option<&str>) -> Resolver {
        Resolver {
            object: object.to_string(),
            field: Field::resolver(member.to_lowercase(), member, "schema.graphql"),
            container: container.map(str::to_string),
            prev: None,
            comment: String::new(),
            attrs: Vec::new(),
            body: String::new(),
        }
    }

    #[test]
    fn test_package_name_is_dir_name() {
        let file = OutputFile::new("graph/users/user.rs", Template::PerSchema);
        assert_eq!(file.package_name(), "users");
        assert_eq!(OutputFile::new("user.rs", Template::PerSchema).package_name(), "");
    }

    #[test]
    fn test_methods_and_functions() {
        let mut file = OutputFile::new("graph/resolver.rs", Template::RootInterface);
        file.add_object("Query");
        file.add_object("Query");
        file.resolvers.push(resolver("Query", "User", Some("queryResolver")));
        file.resolvers.push(resolver("Query", "Users", None));

        assert_eq!(file.objects, ["Query"]);
        assert_eq!(file.methods_of("Query").count(), 1);
        assert_eq!(file.functions().next().unwrap().member(), "Users");
    }
}
