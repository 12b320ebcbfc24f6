//! Parsed view of the Rust sources in a set of directories.

use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{Error, Result, SourceCache, lines::LineIndex, parse::parse_file};

/// Handle to a [`Package`] in a [`SourceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub(crate) usize);

/// Handle to a [`SourceFile`] in a [`SourceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

/// Handle to a [`Declaration`] in a [`SourceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

/// A byte offset inside one indexed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: FileId,
    pub offset: usize,
}

impl Position {
    pub fn new(file: FileId, offset: usize) -> Self {
        Self { file, offset }
    }
}

/// What kind of item a [`Declaration`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A top-level `fn`
    Function,
    /// A `fn` inside an `impl` block
    Method,
    /// A `struct`, `enum`, `union` or `type` alias
    Type,
    /// An `impl` block
    Impl,
    /// A private `use`
    Import,
    /// Anything else, kept as opaque source
    Other,
}

/// One item of a source file.
///
/// The span covers outer attributes and doc comments.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Self type of the enclosing `impl`, empty for everything but
    /// methods and impl blocks
    pub owner: String,
    pub name: String,
    /// Doc comment text with one leading space stripped per line
    pub doc: String,
    /// Source text of each non-doc outer attribute of a function
    pub attrs: Vec<String>,
    pub start: Position,
    pub end: Position,
    /// Text between the braces of a function body
    pub body: Option<(Position, Position)>,
    /// End of `impl ... {` for impl blocks
    pub header_end: Option<Position>,
    /// Items of an impl block, in source order
    pub members: Vec<DeclId>,
}

/// A name brought into scope by a private `use`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    /// Rename given with `as`, empty when there is none
    pub alias: String,
    /// Full path, including a leading `::` if written
    pub path: String,
}

impl Import {
    pub fn new(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
        }
    }
}

/// A parsed `*.rs` file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: PackageId,
    /// Top-level items in source order
    pub items: Vec<DeclId>,
    pub imports: Vec<Import>,
    /// Source text of each inner attribute (`#![..]`, `//!`)
    pub inner_attrs: Vec<String>,
}

/// All `*.rs` files directly inside one directory.
#[derive(Debug, Clone)]
pub struct Package {
    pub dir: PathBuf,
    /// Files in lexicographic path order
    pub files: Vec<FileId>,
}

/// Arena of packages, files and declarations.
#[derive(Debug, Default)]
pub struct SourceIndex {
    packages: Vec<Package>,
    files: Vec<SourceFile>,
    decls: Vec<Declaration>,
    cache: SourceCache,
}

impl SourceIndex {
    /// Parse every `*.rs` file directly inside each of `dirs`.
    ///
    /// A directory listed twice is loaded once.
    pub fn load<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self::default();
        for dir in dirs {
            index.load_package(dir.as_ref())?;
        }
        debug!(
            packages = index.packages.len(),
            files = index.files.len(),
            declarations = index.decls.len(),
            "indexed sources"
        );
        Ok(index)
    }

    fn load_package(&mut self, dir: &Path) -> Result<PackageId> {
        let dir = normalize(dir);
        if let Some(id) = self.package(&dir) {
            return Ok(id);
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| {
            Box::new(Error::DirectoryNotResolvable {
                dir: dir.clone(),
                source,
            })
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                Box::new(Error::DirectoryNotResolvable {
                    dir: dir.clone(),
                    source,
                })
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
                paths.push(path);
            }
        }
        paths.sort();

        let id = PackageId(self.packages.len());
        self.packages.push(Package {
            dir: dir.clone(),
            files: Vec::with_capacity(paths.len()),
        });

        for path in paths {
            let file = self.load_file(id, path)?;
            self.packages[id.0].files.push(file);
        }

        trace!(dir = %dir.display(), files = self.packages[id.0].files.len(), "loaded package");
        Ok(id)
    }

    fn load_file(&mut self, package: PackageId, path: PathBuf) -> Result<FileId> {
        let text = self.cache.read(&path)?;
        let file = FileId(self.files.len());
        let lines = LineIndex::new(&text);

        let parsed = parse_file(&text, &path, &lines, file, &mut self.decls)?;
        self.files.push(SourceFile {
            path,
            package,
            items: parsed.items,
            imports: parsed.imports,
            inner_attrs: parsed.inner_attrs,
        });
        Ok(file)
    }

    /// Package loaded from `dir`, if any.
    pub fn package(&self, dir: impl AsRef<Path>) -> Option<PackageId> {
        let dir = normalize(dir.as_ref());
        self.packages
            .iter()
            .position(|p| p.dir == dir)
            .map(PackageId)
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, p)| (PackageId(i), p))
    }

    pub fn get_package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    /// File at `path` inside `package`, if it was indexed.
    pub fn file_in(&self, package: PackageId, path: impl AsRef<Path>) -> Option<FileId> {
        let path = normalize(path.as_ref());
        self.packages[package.0]
            .files
            .iter()
            .copied()
            .find(|id| self.files[id.0].path == path)
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    pub fn declaration_count(&self) -> usize {
        self.decls.len()
    }

    /// Full text of an indexed file.
    pub fn file_text(&self, id: FileId) -> Result<Rc<str>> {
        self.cache.read(&self.files[id.0].path)
    }

    /// Text between two positions of the same file in `package`.
    pub fn source_text(&self, package: PackageId, start: Position, end: Position) -> Result<String> {
        let start_file = &self.files[start.file.0];
        if start.file != end.file {
            return Err(Box::new(Error::SpanCrossesFiles {
                start: start_file.path.clone(),
                end: self.files[end.file.0].path.clone(),
            }));
        }
        if start_file.package != package {
            return Err(Box::new(Error::ForeignPosition {
                path: start_file.path.clone(),
                package: self.packages[package.0].dir.clone(),
            }));
        }

        let text = self.file_text(start.file)?;
        text.get(start.offset..end.offset)
            .map(str::to_string)
            .ok_or_else(|| {
                Box::new(Error::SpanOutOfBounds {
                    path: start_file.path.clone(),
                    start: start.offset,
                    end: end.offset,
                })
            })
    }

    /// Number of file reads that went to disk.
    pub fn disk_reads(&self) -> usize {
        self.cache.disk_reads()
    }
}

/// Every directory under `root`, `root` included, in walk order.
///
/// A missing root yields nothing. A directory that cannot be read fails the
/// walk.
pub fn discover_dirs(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let dir = err.path().unwrap_or(root).to_path_buf();
                Some(Err(Box::new(Error::DirectoryNotResolvable {
                    dir,
                    source: err.into(),
                })))
            }
        })
        .collect()
}

fn normalize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
