//! Lookups against a [`SourceIndex`] with per-run consumption tracking.

use std::path::Path;

use tracing::{debug, trace};

use crate::{DeclId, DeclKind, FileId, Import, PackageId, Result, SourceIndex};

/// One regeneration run over a [`SourceIndex`].
///
/// Every declaration the run looks up is marked consumed. Whatever is left
/// unconsumed in a file comes back out of [`Session::remaining_source`], so
/// hand-written code survives regeneration without being emitted twice.
///
/// Queries take an `Option<PackageId>`; `None` stands for a directory that
/// was never loaded and behaves as "nothing found".
#[derive(Debug)]
pub struct Session {
    index: SourceIndex,
    consumed: Vec<bool>,
}

impl Session {
    pub fn new(index: SourceIndex) -> Self {
        let consumed = vec![false; index.declaration_count()];
        Self { index, consumed }
    }

    /// Index `dirs` and start a session over them.
    pub fn load<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        SourceIndex::load(dirs).map(Self::new)
    }

    pub fn index(&self) -> &SourceIndex {
        &self.index
    }

    pub fn package(&self, dir: impl AsRef<Path>) -> Option<PackageId> {
        self.index.package(dir)
    }

    pub fn is_consumed(&self, id: DeclId) -> bool {
        self.consumed[id.0]
    }

    /// First function (empty `owner`) or method of `owner` named `member`,
    /// in file order. The match is marked consumed.
    pub fn find_declaration(
        &mut self,
        pkg: Option<PackageId>,
        owner: &str,
        member: &str,
    ) -> Option<DeclId> {
        let found = self.lookup(pkg?, owner, member)?;
        if !self.consumed[found.0] {
            trace!(owner, member, "consumed declaration");
        }
        self.consumed[found.0] = true;
        Some(found)
    }

    fn lookup(&self, pkg: PackageId, owner: &str, member: &str) -> Option<DeclId> {
        let index = &self.index;
        index
            .get_package(pkg)
            .files
            .iter()
            .flat_map(|file| index.file(*file).items.iter().copied())
            .find_map(|id| {
                let decl = index.declaration(id);
                if owner.is_empty() {
                    (decl.kind == DeclKind::Function && decl.name == member).then_some(id)
                } else if decl.kind == DeclKind::Impl && decl.owner == owner {
                    decl.members.iter().copied().find(|m| {
                        let m = index.declaration(*m);
                        m.kind == DeclKind::Method && m.name == member
                    })
                } else {
                    None
                }
            })
    }

    /// Text between the braces of the matching function, empty if there is
    /// none.
    pub fn method_body(
        &mut self,
        pkg: Option<PackageId>,
        owner: &str,
        member: &str,
    ) -> Result<String> {
        let (Some(pkg), Some(id)) = (pkg, self.find_declaration(pkg, owner, member)) else {
            return Ok(String::new());
        };
        match self.index.declaration(id).body {
            Some((start, end)) => self.index.source_text(pkg, start, end),
            None => Ok(String::new()),
        }
    }

    /// Doc comment of the matching function, empty if there is none.
    pub fn method_comment(&mut self, pkg: Option<PackageId>, owner: &str, member: &str) -> String {
        self.find_declaration(pkg, owner, member)
            .map(|id| self.index.declaration(id).doc.clone())
            .unwrap_or_default()
    }

    /// Mark every type declaration named `name` as consumed.
    pub fn mark_type_consumed(&mut self, pkg: Option<PackageId>, name: &str) {
        let Some(pkg) = pkg else {
            return;
        };

        let index = &self.index;
        let matches: Vec<DeclId> = index
            .get_package(pkg)
            .files
            .iter()
            .flat_map(|file| index.file(*file).items.iter().copied())
            .filter(|id| {
                let decl = index.declaration(*id);
                decl.kind == DeclKind::Type && decl.name == name
            })
            .collect();

        trace!(name, count = matches.len(), "consumed type");
        for id in matches {
            self.consumed[id.0] = true;
        }
    }

    /// Imports written in the file at `path`, in source order.
    pub fn existing_imports(&self, pkg: Option<PackageId>, path: impl AsRef<Path>) -> Vec<Import> {
        self.file(pkg, path.as_ref())
            .map(|file| self.index.file(file).imports.clone())
            .unwrap_or_default()
    }

    /// Inner attributes (`#![..]` and `//!` lines) of the file at `path`.
    pub fn inner_attributes(&self, pkg: Option<PackageId>, path: impl AsRef<Path>) -> Vec<String> {
        self.file(pkg, path.as_ref())
            .map(|file| self.index.file(file).inner_attrs.clone())
            .unwrap_or_default()
    }

    /// Every top-level item of the file at `path` that the run has not
    /// consumed, imports excluded, separated by blank lines.
    ///
    /// An `impl` block with some consumed methods is rebuilt from its header
    /// and its remaining members; one with nothing left is dropped.
    pub fn remaining_source(
        &self,
        pkg: Option<PackageId>,
        path: impl AsRef<Path>,
    ) -> Result<String> {
        let (Some(pkg), Some(file)) = (pkg, self.file(pkg, path.as_ref())) else {
            return Ok(String::new());
        };

        let mut out = String::new();
        let mut kept = 0;
        for &id in &self.index.file(file).items {
            let decl = self.index.declaration(id);
            if self.consumed[id.0] || decl.kind == DeclKind::Import {
                continue;
            }

            let text = if decl.members.iter().any(|m| self.consumed[m.0]) {
                match self.rebuild_impl(pkg, file, id)? {
                    Some(text) => text,
                    None => continue,
                }
            } else {
                self.index.source_text(pkg, decl.start, decl.end)?
            };

            out.push_str(&text);
            out.push_str("\n\n");
            kept += 1;
        }

        debug!(path = %path.as_ref().display(), kept, "reconstructed leftover source");
        Ok(out.trim().to_string())
    }

    fn rebuild_impl(&self, pkg: PackageId, file: FileId, id: DeclId) -> Result<Option<String>> {
        let decl = self.index.declaration(id);
        let remaining: Vec<DeclId> = decl
            .members
            .iter()
            .copied()
            .filter(|m| !self.consumed[m.0])
            .collect();
        if remaining.is_empty() {
            return Ok(None);
        }

        let header_end = decl.header_end.unwrap_or(decl.end);
        let mut text = self.index.source_text(pkg, decl.start, header_end)?;
        let file_text = self.index.file_text(file)?;

        for (i, member) in remaining.into_iter().enumerate() {
            let member = self.index.declaration(member);
            let before = &file_text[..member.start.offset];
            let line_start = before.rfind('\n').map_or(0, |n| n + 1);
            let indent = &before[line_start..];
            let indent = if indent.chars().all(|c| c == ' ' || c == '\t') {
                indent
            } else {
                ""
            };

            text.push_str(if i == 0 { "\n" } else { "\n\n" });
            text.push_str(indent);
            text.push_str(&self.index.source_text(pkg, member.start, member.end)?);
        }
        text.push_str("\n}");
        Ok(Some(text))
    }

    fn file(&self, pkg: Option<PackageId>, path: &Path) -> Option<FileId> {
        self.index.file_in(pkg?, path)
    }
}
