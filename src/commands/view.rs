//! `docmap view` — open the interactive canvas on a focus document.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::tui::canvas::{self, ViewOptions};

pub fn run(
    focus: String,
    root: Option<PathBuf>,
    depth: usize,
    max_nodes: usize,
    no_external: bool,
) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    let opts = ViewOptions {
        focus,
        max_depth: depth,
        max_nodes,
        show_external: !no_external,
        ..ViewOptions::default()
    };
    canvas::run(root, &opts)
}
