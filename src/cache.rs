//! Parsed-file cache keyed by absolute path, invalidated by mtime.
//!
//! A cache entry is replaced atomically after a full parse completes; there
//! are no partial updates, which keeps the cache safe to share between the
//! graph builder and the backlink scanner under cooperative scheduling. The
//! derived reverse-link index lives here too and is invalidated wholesale on
//! any file change.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use crate::parser::links::{self, ExternalLink};
use crate::vfs::FileAccess;

/// Files above this size are parsed from a truncated prefix only.
pub const LARGE_FILE_BYTES: u64 = 1024 * 1024;
/// How much of a large file is actually read and parsed.
pub const PARSE_PREFIX_BYTES: u64 = 100 * 1024;

/// Display-oriented stats computed at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub lines: usize,
    pub words: usize,
    /// First markdown heading, falling back to the file stem.
    pub title: String,
    /// First non-heading paragraph, if any.
    pub preview: Option<String>,
    /// True when only a prefix of the file was parsed; some links may be
    /// missing and the UI should say so.
    pub large: bool,
}

/// One fully parsed document. Atomic per file: created whole, replaced whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Forward-slash path relative to the scan root.
    pub rel_path: String,
    pub abs_path: PathBuf,
    /// True on-disk size, even when only a prefix was parsed.
    pub size: u64,
    /// Internal link targets in document order, pre-validation.
    pub links: Vec<String>,
    pub external: Vec<ExternalLink>,
    pub stats: FileStats,
    /// Union of `links`, for broken-link detection.
    pub link_targets: HashSet<String>,
}

struct Entry {
    data: Rc<ParsedFile>,
    mod_time: SystemTime,
}

/// Maps a target path to the set of source paths whose outgoing links mention
/// it. Built by a completed backlink scan, dropped wholesale on invalidation.
pub type ReverseIndex = HashMap<String, HashSet<String>>;

/// Session-owned parse cache. Not global state: each graph view owns one, so
/// concurrent views and test teardown stay deterministic.
#[derive(Default)]
pub struct FileCache {
    entries: HashMap<PathBuf, Entry>,
    reverse: Option<ReverseIndex>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `abs_path` (relative name `rel_path`), reusing the cached result
    /// when the modification time is unchanged. Returns `None` if the file
    /// cannot be read — callers skip it. Remote reads (`conn` present) are
    /// never stored.
    pub fn get(
        &mut self,
        fs: &dyn FileAccess,
        abs_path: &Path,
        rel_path: &str,
        conn: Option<&str>,
    ) -> Option<Rc<ParsedFile>> {
        let stat = fs.stat(abs_path, conn).ok()?;

        if let Some(entry) = self.entries.get(abs_path) {
            if entry.mod_time == stat.modified {
                return Some(Rc::clone(&entry.data));
            }
        }

        let large = stat.size > LARGE_FILE_BYTES;
        let text = if large {
            fs.read_prefix(abs_path, PARSE_PREFIX_BYTES, conn).ok()?
        } else {
            fs.read(abs_path, conn).ok()?
        };

        let extracted = links::extract(&text, rel_path);
        let stats = compute_stats(&text, rel_path, large);
        let link_targets: HashSet<String> = extracted.internal.iter().cloned().collect();

        let parsed = Rc::new(ParsedFile {
            rel_path: rel_path.to_string(),
            abs_path: abs_path.to_path_buf(),
            size: stat.size,
            links: extracted.internal,
            external: extracted.external,
            stats,
            link_targets,
        });

        if conn.is_none() {
            self.entries.insert(
                abs_path.to_path_buf(),
                Entry {
                    data: Rc::clone(&parsed),
                    mod_time: stat.modified,
                },
            );
        }
        Some(parsed)
    }

    /// Drop cache entries for the given paths. Any change may alter
    /// incoming-link relationships, so the reverse index goes with them.
    pub fn invalidate(&mut self, changed: &[PathBuf]) {
        for path in changed {
            self.entries.remove(path);
        }
        self.reverse = None;
    }

    pub fn take_reverse_index(&mut self) -> Option<ReverseIndex> {
        self.reverse.take()
    }

    pub fn set_reverse_index(&mut self, index: ReverseIndex) {
        self.reverse = Some(index);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn compute_stats(text: &str, rel_path: &str, large: bool) -> FileStats {
    let lines = text.lines().count();
    let words = text.split_whitespace().count();

    let mut title = None;
    let mut preview = None;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(heading) = trimmed.strip_prefix('#') {
            if title.is_none() {
                title = Some(heading.trim_start_matches('#').trim().to_string());
            }
            continue;
        }
        if preview.is_none() {
            preview = Some(trimmed.to_string());
        }
        if title.is_some() {
            break;
        }
    }

    let title = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| file_stem(rel_path).to_string());

    FileStats {
        lines,
        words,
        title,
        preview: preview.filter(|p| !p.is_empty()),
        large,
    }
}

/// Basename without its last extension.
pub fn file_stem(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}
