//! `docmap backlinks` — list files that link to the given document.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::graph::backlinks::{run_to_completion, BacklinkScanner};
use crate::graph::build::{build, BuildOptions};
use crate::session::Session;

pub fn run(focus: String, root: Option<PathBuf>) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    let mut session = Session::new(root);

    // Depth 0 on purpose: the loaded set is just the focus document, so every
    // reported source is a direct backlink to it.
    let opts = BuildOptions {
        max_depth: 0,
        max_nodes: 1,
    };
    let result = build(&mut session, &focus, &opts, |_| {})?;

    let mut scanner = BacklinkScanner::new(&result);
    let (updates, _) = run_to_completion(&mut scanner, &mut session);

    if updates.is_empty() {
        println!("no backlinks to {focus}");
        return Ok(());
    }

    println!("{} backlink(s) to {focus}:", updates.len());
    for update in updates {
        println!("  {}", update.node.id);
    }
    Ok(())
}
