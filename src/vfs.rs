//! File-system collaborator boundary.
//!
//! The engine never touches `std::fs` directly outside this module; everything
//! goes through [`FileAccess`] so the host can substitute a remote-backed
//! implementation. Calls optionally carry a remote-connection identifier —
//! the parsed-file cache is only populated for local calls (no identifier).

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Size and modification time of a file, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: SystemTime,
}

/// Host file-system operations the engine depends on.
///
/// `conn` is an opaque remote-connection identifier. `None` means local; the
/// cache layer treats non-local reads as uncacheable.
pub trait FileAccess {
    fn stat(&self, path: &Path, conn: Option<&str>) -> Result<FileStat>;

    /// Read at most `max_bytes` from the start of the file as UTF-8 text.
    /// Invalid UTF-8 is replaced, not rejected.
    fn read_prefix(&self, path: &Path, max_bytes: u64, conn: Option<&str>) -> Result<String>;

    fn read(&self, path: &Path, conn: Option<&str>) -> Result<String>;
}

/// Direct local-disk implementation.
#[derive(Debug, Default)]
pub struct LocalFiles;

impl FileAccess for LocalFiles {
    fn stat(&self, path: &Path, _conn: Option<&str>) -> Result<FileStat> {
        let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let modified = meta
            .modified()
            .with_context(|| format!("mtime {}", path.display()))?;
        Ok(FileStat {
            size: meta.len(),
            modified,
        })
    }

    fn read_prefix(&self, path: &Path, max_bytes: u64, _conn: Option<&str>) -> Result<String> {
        let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut buf = Vec::with_capacity(max_bytes.min(1 << 20) as usize);
        file.take(max_bytes)
            .read_to_end(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn read(&self, path: &Path, _conn: Option<&str>) -> Result<String> {
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_reports_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let p = dir.path().join("a.md");
        fs::write(&p, "hello").unwrap();
        let stat = LocalFiles.stat(&p, None).unwrap();
        assert_eq!(stat.size, 5);
    }

    #[test]
    fn stat_missing_file_is_err() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(LocalFiles.stat(&dir.path().join("nope.md"), None).is_err());
    }

    #[test]
    fn read_prefix_truncates() {
        let dir = tempfile::TempDir::new().unwrap();
        let p = dir.path().join("a.md");
        fs::write(&p, "0123456789").unwrap();
        let text = LocalFiles.read_prefix(&p, 4, None).unwrap();
        assert_eq!(text, "0123");
    }
}
