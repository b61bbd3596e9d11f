//! Per-view session state.
//!
//! A session owns the parsed-file cache and the file-system handle for one
//! graph view. Keeping these here instead of in module-level statics lets the
//! host run multiple views side by side and gives tests deterministic
//! teardown.

use std::path::{Path, PathBuf};

use crate::cache::FileCache;
use crate::vfs::{FileAccess, LocalFiles};

pub struct Session {
    pub root: PathBuf,
    pub cache: FileCache,
    fs: Box<dyn FileAccess>,
    /// Remote-connection identifier, if this view is backed by a remote host.
    conn: Option<String>,
}

impl Session {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: FileCache::new(),
            fs: Box::new(LocalFiles),
            conn: None,
        }
    }

    #[cfg(test)]
    pub fn with_fs(root: impl Into<PathBuf>, fs: Box<dyn FileAccess>) -> Self {
        Self {
            root: root.into(),
            cache: FileCache::new(),
            fs,
            conn: None,
        }
    }

    pub fn fs(&self) -> &dyn FileAccess {
        self.fs.as_ref()
    }

    pub fn conn(&self) -> Option<&str> {
        self.conn.as_deref()
    }

    /// Absolute path for a root-relative document path.
    pub fn abs_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Parse a root-relative document through the cache.
    pub fn parse(&mut self, rel: &str) -> Option<std::rc::Rc<crate::cache::ParsedFile>> {
        let abs = self.abs_path(rel);
        self.cache.get(self.fs.as_ref(), &abs, rel, self.conn.as_deref())
    }

    /// File-watcher entry point: invalidate cache entries for changed paths.
    pub fn files_changed(&mut self, changed: &[PathBuf]) {
        self.cache.invalidate(changed);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
