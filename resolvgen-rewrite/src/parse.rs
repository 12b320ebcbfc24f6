//! Extraction of declarations from parsed source files.

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use proc_macro2::Span;
use syn::{
    AttrStyle, Attribute, Block, Expr, ExprLit, ImplItem, Item, ItemImpl, Lit, Meta, Type, UseTree,
    Visibility, spanned::Spanned,
};

use crate::{
    DeclId, DeclKind, Declaration, Error, FileId, Import, Position, Result, lines::LineIndex,
};

pub(crate) struct ParsedFile {
    pub items: Vec<DeclId>,
    pub imports: Vec<Import>,
    pub inner_attrs: Vec<String>,
}

/// Parse `text` and append its declarations to `decls`.
pub(crate) fn parse_file(
    text: &str,
    path: &Path,
    lines: &LineIndex,
    file: FileId,
    decls: &mut Vec<Declaration>,
) -> Result<ParsedFile> {
    let syntax = syn::parse_file(text).map_err(|err| load_error(err, text, path, lines))?;

    let mut collector = Collector {
        text,
        lines,
        file,
        decls,
    };
    let mut parsed = ParsedFile {
        items: Vec::with_capacity(syntax.items.len()),
        imports: Vec::new(),
        inner_attrs: syntax
            .attrs
            .iter()
            .filter(|a| matches!(a.style, AttrStyle::Inner(_)))
            .map(|a| collector.slice(a.span()))
            .collect(),
    };
    for item in &syntax.items {
        let id = collector.item(item, &mut parsed.imports);
        parsed.items.push(id);
    }
    Ok(parsed)
}

fn load_error(err: syn::Error, text: &str, path: &Path, lines: &LineIndex) -> Box<Error> {
    let span = err.span();
    let label = (span.start().line > 0).then(|| {
        let start = lines.offset(text, span.start());
        let end = lines.offset(text, span.end()).max(start);
        SourceSpan::from((start, end - start))
    });

    Box::new(Error::PackageLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
        src: NamedSource::new(path.display().to_string(), text.to_string()),
        span: label,
    })
}

struct Collector<'a> {
    text: &'a str,
    lines: &'a LineIndex,
    file: FileId,
    decls: &'a mut Vec<Declaration>,
}

impl Collector<'_> {
    fn item(&mut self, item: &Item, imports: &mut Vec<Import>) -> DeclId {
        let mut decl = self.declaration(item.span());
        match item {
            Item::Fn(f) => {
                decl.kind = DeclKind::Function;
                decl.name = f.sig.ident.to_string();
                decl.doc = doc_text(&f.attrs);
                decl.attrs = self.outer_attrs(&f.attrs);
                decl.body = Some(self.body(&f.block));
            }
            Item::Struct(s) => self.named_type(&mut decl, &s.ident, &s.attrs),
            Item::Enum(e) => self.named_type(&mut decl, &e.ident, &e.attrs),
            Item::Union(u) => self.named_type(&mut decl, &u.ident, &u.attrs),
            Item::Type(t) => self.named_type(&mut decl, &t.ident, &t.attrs),
            Item::Use(u) if matches!(u.vis, Visibility::Inherited) => {
                decl.kind = DeclKind::Import;
                let root = if u.leading_colon.is_some() { "::" } else { "" };
                flatten_use(&u.tree, root, &mut Vec::new(), imports);
            }
            Item::Impl(block) => return self.impl_block(block, decl),
            _ => {}
        }
        self.push(decl)
    }

    fn impl_block(&mut self, block: &ItemImpl, mut decl: Declaration) -> DeclId {
        let owner = receiver_name(&block.self_ty).unwrap_or_default();
        decl.kind = DeclKind::Impl;
        decl.header_end = Some(self.position(block.brace_token.span.open().end()));
        decl.members = block
            .items
            .iter()
            .map(|member| self.member(member, &owner))
            .collect();
        decl.owner = owner;
        self.push(decl)
    }

    fn member(&mut self, member: &ImplItem, owner: &str) -> DeclId {
        let mut decl = self.declaration(member.span());
        if let ImplItem::Fn(f) = member {
            decl.kind = DeclKind::Method;
            decl.owner = owner.to_string();
            decl.name = f.sig.ident.to_string();
            decl.doc = doc_text(&f.attrs);
            decl.attrs = self.outer_attrs(&f.attrs);
            decl.body = Some(self.body(&f.block));
        }
        self.push(decl)
    }

    fn named_type(&self, decl: &mut Declaration, ident: &syn::Ident, attrs: &[Attribute]) {
        decl.kind = DeclKind::Type;
        decl.name = ident.to_string();
        decl.doc = doc_text(attrs);
    }

    fn outer_attrs(&self, attrs: &[Attribute]) -> Vec<String> {
        attrs
            .iter()
            .filter(|a| matches!(a.style, AttrStyle::Outer) && !a.path().is_ident("doc"))
            .map(|a| self.slice(a.span()))
            .collect()
    }

    fn slice(&self, span: Span) -> String {
        let start = self.lines.offset(self.text, span.start());
        let end = self.lines.offset(self.text, span.end()).max(start);
        self.text.get(start..end).unwrap_or_default().to_string()
    }

    fn body(&self, block: &Block) -> (Position, Position) {
        let braces = block.brace_token.span;
        (
            self.position(braces.open().end()),
            self.position(braces.close().start()),
        )
    }

    fn declaration(&self, span: Span) -> Declaration {
        Declaration {
            kind: DeclKind::Other,
            owner: String::new(),
            name: String::new(),
            doc: String::new(),
            attrs: Vec::new(),
            start: self.position(span.start()),
            end: self.position(span.end()),
            body: None,
            header_end: None,
            members: Vec::new(),
        }
    }

    fn position(&self, pos: proc_macro2::LineColumn) -> Position {
        Position::new(self.file, self.lines.offset(self.text, pos))
    }

    fn push(&mut self, decl: Declaration) -> DeclId {
        self.decls.push(decl);
        DeclId(self.decls.len() - 1)
    }
}

/// Name of the self type of an `impl`.
///
/// Only a single-segment path qualifies, behind at most one reference or
/// raw pointer. Generic arguments are ignored.
fn receiver_name(ty: &Type) -> Option<String> {
    let ty = match ty {
        Type::Reference(r) => &*r.elem,
        Type::Ptr(p) => &*p.elem,
        other => other,
    };
    match ty {
        Type::Path(tp)
            if tp.qself.is_none()
                && tp.path.leading_colon.is_none()
                && tp.path.segments.len() == 1 =>
        {
            Some(tp.path.segments[0].ident.to_string())
        }
        _ => None,
    }
}

/// Doc comment text, one line per `///` line.
fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        else {
            continue;
        };
        for line in s.value().split('\n') {
            let line = line.trim_end_matches('\r');
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        }
    }
    lines.join("\n")
}

fn flatten_use(tree: &UseTree, root: &str, prefix: &mut Vec<String>, out: &mut Vec<Import>) {
    let join = |prefix: &[String], last: Option<&str>| {
        let mut segments: Vec<&str> = prefix.iter().map(String::as_str).collect();
        segments.extend(last);
        format!("{root}{}", segments.join("::"))
    };
    let leaf = |ident: &syn::Ident| {
        if ident == "self" {
            None
        } else {
            Some(ident.to_string())
        }
    };

    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            flatten_use(&path.tree, root, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) => {
            let last = leaf(&name.ident);
            out.push(Import::new("", join(prefix, last.as_deref())));
        }
        UseTree::Rename(rename) => {
            let last = leaf(&rename.ident);
            out.push(Import::new(
                rename.rename.to_string(),
                join(prefix, last.as_deref()),
            ));
        }
        UseTree::Glob(_) => out.push(Import::new("", join(prefix, Some("*")))),
        UseTree::Group(group) => {
            for tree in &group.items {
                flatten_use(tree, root, prefix, out);
            }
        }
    }
}
