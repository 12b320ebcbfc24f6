//! Regeneration of resolver files from the schema model.

use std::path::{Component, Path, PathBuf};

use eyre::{Result, WrapErr};
use indexmap::IndexMap;
use resolvgen_config::{Config, Layout, ResolverConfig};
use resolvgen_core::{
    File, FileRules, Overwrite, Version, WriteResult, lc_first, to_snake_case, uc_first,
};
use resolvgen_ir::{Field, Object, Schema};
use resolvgen_rewrite::{PackageId, Session, discover_dirs};
use tracing::{debug, info};

use crate::{
    Implementer, OutputFile, PackageLoader, Plugin, RenderOptions, Renderer, Resolver,
    ResolverBuild, RustRenderer, Template,
};

const SINGLE_FILE_NOTICE: &str =
    "// THIS CODE IS A STARTING POINT ONLY. IT WILL NOT BE UPDATED WITH SCHEMA CHANGES.";

/// Name of the type holding the resolvers of `object`, e.g. `mutationResolver`.
pub fn container_name(object: &str, type_name: &str) -> String {
    format!("{}{}", lc_first(object), uc_first(type_name))
}

/// Name of the root method returning the container of `object`.
pub fn accessor_name(object: &str) -> String {
    to_snake_case(object)
}

/// Files to render for one run, in the order they were first needed.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub files: Vec<OutputFile>,
    /// Comment lines placed at the top of every file
    pub notice: String,
    /// Whether the root resolver type is declared by the output
    pub has_root: bool,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&OutputFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path.as_path() == path)
    }
}

/// A rendered file that has not been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    pub path: PathBuf,
    pub template: Template,
    pub content: String,
}

/// Result of writing a plan to disk
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub written: Vec<PathBuf>,
    /// Files whose content already matched.
    pub unchanged: Vec<PathBuf>,
    /// Starting points left alone because they already existed.
    pub skipped: Vec<PathBuf>,
}

/// Regenerates resolver sources, keeping hand-written implementations.
///
/// # Example
///
/// ```ignore
/// let mut packages = RequiredPackages::new();
/// let result = Generator::new(&config, &schema)
///     .base_dir(project_root)
///     .plugin(MyImplementer)
///     .generate(&mut packages)?;
/// ```
pub struct Generator<'a> {
    config: &'a Config,
    schema: &'a Schema,
    base_dir: PathBuf,
    plugins: Vec<Box<dyn Plugin>>,
    renderer: Box<dyn Renderer>,
    version: Version,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config, schema: &'a Schema) -> Self {
        Self {
            config,
            schema,
            base_dir: PathBuf::from("."),
            plugins: Vec::new(),
            renderer: Box::new(RustRenderer),
            version: Version::current(),
        }
    }

    /// Directory configured paths are relative to.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Version stamped into file notices.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Decide what every output file contains.
    ///
    /// Reads previous sources but writes nothing.
    pub fn plan(&self, loader: &mut dyn PackageLoader) -> Result<Plan> {
        let Some(resolver) = &self.config.resolver else {
            debug!("no resolver configured, nothing to generate");
            return Ok(Plan::default());
        };

        match resolver.layout {
            Layout::SingleFile => Ok(self.plan_single_file(resolver)),
            Layout::FollowSchema => self.plan_follow_schema(resolver, loader),
        }
    }

    /// Render every planned file without writing anything.
    pub fn preview(&self, loader: &mut dyn PackageLoader) -> Result<Vec<PreviewFile>> {
        let plan = self.plan(loader)?;
        self.render(&plan)
    }

    /// Render every file in `plan`.
    pub fn render(&self, plan: &Plan) -> Result<Vec<PreviewFile>> {
        let Some(resolver) = &self.config.resolver else {
            return Ok(Vec::new());
        };

        plan.files
            .iter()
            .map(|file| {
                let package_name = match file.template {
                    Template::SingleFile => resolver.package_name(),
                    _ => file.package_name(),
                };
                let options = RenderOptions {
                    package_name: &package_name,
                    file_notice: &plan.notice,
                    filename: file.path(),
                    template: file.template,
                    build: ResolverBuild {
                        file,
                        has_root: plan.has_root,
                        type_name: &resolver.type_name,
                        context_type: &resolver.context_type,
                        omit_template_comment: resolver.omit_template_comment,
                    },
                };
                let content = self
                    .renderer
                    .render(&options)
                    .wrap_err_with(|| format!("failed to render {}", file.path().display()))?;
                Ok(PreviewFile {
                    path: file.path.clone(),
                    template: file.template,
                    content,
                })
            })
            .collect()
    }

    /// Render every planned file, then write them all.
    pub fn generate(&self, loader: &mut dyn PackageLoader) -> Result<GenerateResult> {
        let files = self.preview(loader)?;

        let mut result = GenerateResult::default();
        for preview in files {
            let overwrite = match preview.template {
                Template::SingleFile => Overwrite::IfMissing,
                _ => Overwrite::Always,
            };
            let written = File::new(&preview.path, preview.content)
                .with_rules(FileRules { overwrite })
                .write()?;
            match written {
                WriteResult::Written => {
                    info!(path = %preview.path.display(), "wrote resolver file");
                    result.written.push(preview.path);
                }
                WriteResult::Unchanged => result.unchanged.push(preview.path),
                WriteResult::Skipped => result.skipped.push(preview.path),
            }
        }
        Ok(result)
    }

    fn plan_single_file(&self, resolver: &ResolverConfig) -> Plan {
        let root_path = self.base_dir.join(&resolver.filename);
        if root_path.exists() {
            info!(
                path = %root_path.display(),
                "single-file resolver already exists, leaving it alone"
            );
            return Plan::default();
        }

        let mut file = OutputFile::new(&root_path, Template::SingleFile);
        for object in &self.schema.objects {
            if object.has_resolvers() {
                file.add_object(&object.name);
            }
            let container = container_name(&object.name, &resolver.type_name);
            for field in object.resolver_fields() {
                file.resolvers.push(Resolver {
                    object: object.name.clone(),
                    field: field.clone(),
                    container: Some(container.clone()),
                    prev: None,
                    comment: String::new(),
                    attrs: Vec::new(),
                    body: "todo!(\"not implemented\")".to_string(),
                });
            }
        }

        Plan {
            files: vec![file],
            notice: SINGLE_FILE_NOTICE.to_string(),
            has_root: true,
        }
    }

    fn plan_follow_schema(
        &self,
        resolver: &ResolverConfig,
        loader: &mut dyn PackageLoader,
    ) -> Result<Plan> {
        let root_path = self.base_dir.join(&resolver.filename);
        let resolver_dir = self.base_dir.join(resolver.dir());
        let type_name = resolver.type_name.as_str();

        let dirs = discover_dirs(&resolver_dir).wrap_err_with(|| {
            format!("failed to walk resolver sources under {}", resolver_dir.display())
        })?;
        let mut session = Session::load(&dirs).wrap_err_with(|| {
            format!(
                "failed to index resolver sources under {}",
                resolver_dir.display()
            )
        })?;
        let root_pkg = session.package(&resolver_dir);

        let implementer = self.implementer();
        let mut files: IndexMap<PathBuf, OutputFile> = IndexMap::new();
        let mut aliases: IndexMap<String, String> = IndexMap::new();

        // Container types and forwarding methods in the root file
        for object in self.schema.all_objects() {
            let container = container_name(&object.name, type_name);
            if object.has_resolvers() {
                session.mark_type_consumed(root_pkg, &container);
                session.find_declaration(root_pkg, type_name, &accessor_name(&object.name));
                root_file(&mut files, &root_path).add_object(&object.name);
            }

            for field in object.resolver_fields() {
                let location = SchemaLocation::new(&field.position.src, &resolver.schema_dir);
                let alias = location.module_path(&resolver.import_path).map(|path| {
                    let next = format!("mod{}", aliases.len() + 1);
                    let alias = aliases.entry(path).or_insert(next);
                    alias.clone()
                });

                let resolved = self.resolve(
                    &mut session,
                    root_pkg,
                    &container,
                    object,
                    field,
                    implementer,
                    || forward_call(alias.as_deref(), field),
                )?;
                root_file(&mut files, &root_path).resolvers.push(Resolver {
                    container: Some(container.clone()),
                    ..resolved
                });
            }
        }

        // Free functions mirroring each schema file
        for object in self.schema.all_objects() {
            for field in object.resolver_fields() {
                let location = SchemaLocation::new(&field.position.src, &resolver.schema_dir);
                let path = location.target_file(&resolver_dir, resolver.filename_template());
                let pkg = path.parent().and_then(|dir| session.package(dir));

                let resolved = self.resolve(&mut session, pkg, "", object, field, implementer, || {
                    format!(
                        "todo!(\"not implemented: {} - {}\")",
                        field.member_name, field.name
                    )
                })?;

                let template = if path == root_path {
                    Template::RootInterface
                } else {
                    Template::PerSchema
                };
                files
                    .entry(path.clone())
                    .or_insert_with(|| OutputFile::new(&path, template))
                    .resolvers
                    .push(resolved);
            }
        }

        // Carry over what the run did not account for
        for (path, file) in files.iter_mut() {
            let pkg = path.parent().and_then(|dir| session.package(dir));
            file.inner_attrs = session.inner_attributes(pkg, path);
            if *path == root_path {
                for (mod_path, alias) in &aliases {
                    file.imports.add(alias, mod_path);
                    loader.load(mod_path);
                }
                continue;
            }

            file.imports.extend(session.existing_imports(pkg, path));
            file.leftover = session
                .remaining_source(pkg, path)
                .wrap_err_with(|| format!("failed to reconstruct {}", path.display()))?;
        }

        debug!(
            files = files.len(),
            aliases = aliases.len(),
            "planned follow-schema layout"
        );
        Ok(Plan {
            files: files.into_values().collect(),
            notice: self.file_notice(),
            has_root: false,
        })
    }

    /// Previous comment and body of a resolver, or a synthesized body.
    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        session: &mut Session,
        pkg: Option<PackageId>,
        owner: &str,
        object: &Object,
        field: &Field,
        implementer: Option<&dyn Implementer>,
        default_body: impl FnOnce() -> String,
    ) -> Result<Resolver> {
        let member = field.member_name.as_str();
        let comment = session.method_comment(pkg, owner, member).trim().to_string();
        let mut body = session
            .method_body(pkg, owner, member)
            .wrap_err_with(|| format!("failed to read previous body of {member}"))?
            .trim()
            .to_string();
        let prev = session.find_declaration(pkg, owner, member);
        let attrs = prev
            .map(|id| session.index().declaration(id).attrs.clone())
            .unwrap_or_default();

        if body.is_empty() {
            body = match implementer {
                Some(implementer) => implementer.implement(object, field),
                None => default_body(),
            };
        }
        debug!(
            object = %object.name,
            field = %field.name,
            owner,
            previous = prev.is_some(),
            "planned resolver"
        );

        Ok(Resolver {
            object: object.name.clone(),
            field: field.clone(),
            container: None,
            prev,
            comment,
            attrs,
            body,
        })
    }

    fn implementer(&self) -> Option<&dyn Implementer> {
        let (plugin, implementer) = self
            .plugins
            .iter()
            .find_map(|p| p.implementer().map(|i| (p.name(), i)))?;
        debug!(plugin, "using resolver implementer");
        Some(implementer)
    }

    fn file_notice(&self) -> String {
        if self.config.omit_file_notice {
            return String::new();
        }

        let mut notice = String::from(
            "// This file will be automatically regenerated based on the schema,\n\
             // any custom resolver implementations will be preserved.\n\
             // Code generated by resolvgen",
        );
        if !self.config.omit_version_in_file_notice {
            notice.push_str(" version ");
            notice.push_str(&self.version.to_string());
        }
        notice
    }
}

fn root_file<'f>(files: &'f mut IndexMap<PathBuf, OutputFile>, path: &Path) -> &'f mut OutputFile {
    files
        .entry(path.to_path_buf())
        .or_insert_with(|| OutputFile::new(path, Template::RootInterface))
}

/// Default root body: forward to the free function of the same name.
fn forward_call(alias: Option<&str>, field: &Field) -> String {
    let args: Vec<&str> = std::iter::once("ctx").chain(field.arg_names()).collect();
    match alias {
        Some(alias) => format!(
            "return {alias}::{}({})",
            field.member_name,
            args.join(",")
        ),
        None => format!("return {}({})", field.member_name, args.join(",")),
    }
}

/// Where a schema file sits relative to the schema root.
#[derive(Debug)]
struct SchemaLocation {
    dirs: Vec<String>,
    stem: String,
}

impl SchemaLocation {
    fn new(src: &str, schema_dir: &str) -> Self {
        let relative = Path::new(src.strip_prefix(schema_dir).unwrap_or(src));
        let dirs = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { dirs, stem }
    }

    /// Module path of the schema file's directory, `None` at the root.
    fn module_path(&self, import_path: &str) -> Option<String> {
        if self.dirs.is_empty() {
            return None;
        }
        let segments: Vec<String> = self.dirs.iter().map(|d| d.replace('-', "_")).collect();
        Some(format!("{}::{}", import_path, segments.join("::")))
    }

    fn target_file(&self, resolver_dir: &Path, template: &str) -> PathBuf {
        let mut path = resolver_dir.to_path_buf();
        path.extend(&self.dirs);
        path.join(template.replace("{name}", &self.stem))
    }
}
