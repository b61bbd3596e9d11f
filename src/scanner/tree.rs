//! Document-tree scanner.
//!
//! Uses the `ignore` crate (same engine as ripgrep) for correct gitignore
//! semantics. Skips hidden entries and common non-content directories, keeps
//! only document files, and returns paths relative to the root with forward
//! slashes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Extensions treated as linked text documents.
const DOCUMENT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Directories that never contain user documents.
const SKIPPED_DIRS: [&str; 6] = ["node_modules", "target", "dist", "build", "vendor", ".git"];

/// Scan the document tree rooted at `root`.
///
/// Returns all non-ignored document files as forward-slash paths relative to
/// `root`, sorted for deterministic traversal order. Fails only when the root
/// itself cannot be walked.
pub fn scan(root: &Path) -> Result<Vec<String>> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true) // skip dotfiles and dot-directories
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .require_git(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.path().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        });

    let mut entries: Vec<String> = Vec::new();

    for result in builder.build() {
        let entry = result.with_context(|| "error walking document tree")?;
        let path = entry.path();
        if path == root || path.is_dir() {
            continue;
        }
        if !is_document(path) {
            continue;
        }
        entries.push(relative_to(root, path)?);
    }

    entries.sort();
    Ok(entries)
}

/// True when the file's extension marks it as a linked text document.
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            DOCUMENT_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Return the path of `target` relative to `base`, as a forward-slash string.
pub fn relative_to(base: &Path, target: &Path) -> Result<String> {
    let rel: PathBuf = target
        .strip_prefix(base)
        .with_context(|| format!("{:?} is not under {:?}", target, base))?
        .into();

    // Always use forward slashes, even on Windows.
    let s = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tree(root: &Path, files: &[&str]) {
        for f in files {
            let p = root.join(f);
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&p, "").unwrap();
        }
    }

    fn tmpdir() -> tempfile::TempDir {
        tempfile::TempDir::new().unwrap()
    }

    #[test]
    fn finds_documents_only() {
        let dir = tmpdir();
        make_tree(dir.path(), &["a.md", "notes/b.markdown", "c.txt", "img.png"]);
        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries, vec!["a.md", "c.txt", "notes/b.markdown"]);
    }

    #[test]
    fn hidden_entries_skipped() {
        let dir = tmpdir();
        make_tree(dir.path(), &[".obsidian/workspace.md", ".hidden.md", "a.md"]);
        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries, vec!["a.md"]);
    }

    #[test]
    fn non_content_dirs_skipped() {
        let dir = tmpdir();
        make_tree(
            dir.path(),
            &["node_modules/pkg/readme.md", "target/doc/x.md", "a.md"],
        );
        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries, vec!["a.md"]);
    }

    #[test]
    fn gitignore_respected() {
        let dir = tmpdir();
        make_tree(dir.path(), &["a.md", "drafts/b.md"]);
        fs::write(dir.path().join(".gitignore"), "drafts/\n").unwrap();
        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries, vec!["a.md"]);
    }

    #[test]
    fn sorted_output() {
        let dir = tmpdir();
        make_tree(dir.path(), &["z.md", "a.md", "m.md"]);
        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries, vec!["a.md", "m.md", "z.md"]);
    }

    #[test]
    fn empty_tree() {
        let dir = tmpdir();
        let entries = scan(dir.path()).unwrap();
        assert!(entries.is_empty());
    }
}
