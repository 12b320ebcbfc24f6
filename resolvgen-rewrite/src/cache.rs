//! Per-path file text cache.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{Error, Result};

const BOM: char = '\u{feff}';

/// Reads source files at most once per path.
///
/// Text is kept for the lifetime of the cache, so every span computed from
/// a parse stays valid against the text it was computed from, even if the
/// file changes on disk afterwards.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: RefCell<HashMap<PathBuf, Rc<str>>>,
    reads: Cell<usize>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of `path`, read from disk on first request.
    ///
    /// A leading byte order mark is dropped.
    pub fn read(&self, path: &Path) -> Result<Rc<str>> {
        if let Some(text) = self.files.borrow().get(path) {
            return Ok(Rc::clone(text));
        }

        let content = std::fs::read_to_string(path).map_err(|source| {
            Box::new(Error::ReadSource {
                path: path.to_path_buf(),
                source,
            })
        })?;
        self.reads.set(self.reads.get() + 1);

        let text: Rc<str> = content.strip_prefix(BOM).unwrap_or(&content).into();
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&text));
        Ok(text)
    }

    /// Number of reads that went to disk.
    pub fn disk_reads(&self) -> usize {
        self.reads.get()
    }

    /// Whether `path` is already cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_second_read_is_cache_hit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("user.rs");
        fs::write(&path, "fn a() {}").unwrap();

        let cache = SourceCache::new();
        assert!(!cache.contains(&path));
        assert_eq!(&*cache.read(&path).unwrap(), "fn a() {}");

        fs::write(&path, "fn b() {}").unwrap();
        assert_eq!(&*cache.read(&path).unwrap(), "fn a() {}");
        assert_eq!(cache.disk_reads(), 1);
        assert!(cache.contains(&path));
    }

    #[test]
    fn test_bom_is_stripped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bom.rs");
        fs::write(&path, "\u{feff}fn a() {}").unwrap();

        let cache = SourceCache::new();
        assert_eq!(&*cache.read(&path).unwrap(), "fn a() {}");
    }

    #[test]
    fn test_missing_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.rs");

        let err = SourceCache::new().read(&path).unwrap_err();
        match *err {
            Error::ReadSource { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
