//! Rendering of planned output files to Rust source.

use std::path::Path;

use eyre::Result;

use crate::{CodeBuilder, OutputFile, Resolver, accessor_name, container_name};

/// Which layout a file is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Everything in one file, including the root resolver type
    SingleFile,
    /// Container types and forwarding methods in the root file
    RootInterface,
    /// Free resolver functions mirroring one schema file
    PerSchema,
}

/// Resolver data a template is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct ResolverBuild<'a> {
    pub file: &'a OutputFile,
    /// Whether to declare the root resolver type itself
    pub has_root: bool,
    pub type_name: &'a str,
    pub context_type: &'a str,
    pub omit_template_comment: bool,
}

/// Input to a [`Renderer`] for one file.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub package_name: &'a str,
    /// Comment lines placed at the very top, may be empty
    pub file_notice: &'a str,
    pub filename: &'a Path,
    pub template: Template,
    pub build: ResolverBuild<'a>,
}

/// Turns a planned file into source text.
pub trait Renderer {
    fn render(&self, options: &RenderOptions<'_>) -> Result<String>;
}

/// Built-in renderer producing rustfmt-style Rust source.
///
/// The package name is not written: a Rust module takes its name from the
/// file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustRenderer;

impl Renderer for RustRenderer {
    fn render(&self, options: &RenderOptions<'_>) -> Result<String> {
        let build = &options.build;
        let mut sections = Vec::new();

        if !options.file_notice.is_empty() {
            sections.push(notice(options.file_notice));
        }

        if !build.file.inner_attrs.is_empty() {
            let mut b = CodeBuilder::default();
            for attr in &build.file.inner_attrs {
                b.verbatim(attr);
            }
            sections.push(b.build());
        }

        if !build.file.imports.is_empty() {
            let mut b = CodeBuilder::default();
            for line in build.file.imports.lines() {
                b.line(&line);
            }
            sections.push(b.build());
        }

        match options.template {
            Template::SingleFile | Template::RootInterface => root_sections(build, &mut sections),
            Template::PerSchema => {}
        }

        for resolver in build.file.functions() {
            let mut b = CodeBuilder::default();
            resolver_fn(&mut b, resolver, build);
            sections.push(b.build());
        }

        let leftover = build.file.leftover.trim();
        if !leftover.is_empty() {
            sections.push(format!("{leftover}\n"));
        }

        Ok(sections.join("\n"))
    }
}

fn notice(text: &str) -> String {
    let mut b = CodeBuilder::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        b.line(line);
    }
    b.build()
}

fn root_sections(build: &ResolverBuild<'_>, sections: &mut Vec<String>) {
    let file = build.file;
    let type_name = build.type_name;

    if build.has_root {
        sections.push(format!("pub struct {type_name};\n"));
    }

    if !file.objects.is_empty() {
        let mut b = CodeBuilder::default();
        b.block(&format!("impl {type_name} {{"), "}", |b| {
            for (i, object) in file.objects.iter().enumerate() {
                let container = container_name(object, type_name);
                b.when(i > 0, |b| {
                    b.blank();
                });
                b.block(
                    &format!(
                        "pub fn {}(&self) -> {container}<'_> {{",
                        accessor_name(object)
                    ),
                    "}",
                    |b| {
                        b.line(&format!("{container} {{ resolver: self }}"));
                    },
                );
            }
        });
        sections.push(b.build());
    }

    for object in &file.objects {
        let container = container_name(object, type_name);

        let mut b = CodeBuilder::default();
        b.line("#[allow(non_camel_case_types)]");
        b.block(&format!("pub struct {container}<'r> {{"), "}", |b| {
            b.line(&format!("pub resolver: &'r {type_name},"));
        });
        sections.push(b.build());

        let mut b = CodeBuilder::default();
        b.block(&format!("impl {container}<'_> {{"), "}", |b| {
            for (i, resolver) in file.methods_of(object).enumerate() {
                b.when(i > 0, |b| {
                    b.blank();
                });
                resolver_fn(b, resolver, build);
            }
        });
        sections.push(b.build());
    }
}

fn resolver_fn(b: &mut CodeBuilder, resolver: &Resolver, build: &ResolverBuild<'_>) {
    let comment = resolver.comment.trim();
    if !comment.is_empty() {
        b.rust_doc(comment);
    } else if !build.omit_template_comment {
        b.line(&format!(
            "/// {} is the resolver for the {} field.",
            resolver.member(),
            resolver.field.name
        ));
    }
    for attr in &resolver.attrs {
        b.verbatim(attr);
    }

    b.block(&format!("{} {{", signature(resolver, build.context_type)), "}", |b| {
        b.verbatim(&resolver.body);
    });
}

fn signature(resolver: &Resolver, context_type: &str) -> String {
    let mut params = Vec::with_capacity(resolver.field.args.len() + 2);
    if resolver.is_method() {
        params.push("&self".to_string());
    }
    params.push(format!("ctx: {context_type}"));
    params.extend(
        resolver
            .field
            .args
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.ty)),
    );

    let ret = resolver
        .field
        .return_type
        .as_deref()
        .map(|ty| format!(" -> {ty}"))
        .unwrap_or_default();
    format!("pub fn {}({}){}", resolver.member(), params.join(", "), ret)
}
