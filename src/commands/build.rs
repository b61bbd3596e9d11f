//! `docmap build` — one-shot graph build with a text summary.
//!
//! Useful for scripting and for sanity-checking a tree without entering the
//! TUI: prints every loaded document, its broken links, and the external
//! domains it references.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::graph::build::{build, BuildOptions, Phase};
use crate::graph::model::EdgeKind;
use crate::session::Session;

pub fn run(
    focus: String,
    root: Option<PathBuf>,
    depth: usize,
    max_nodes: usize,
    verbose: bool,
) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    let mut session = Session::new(root);
    let opts = BuildOptions {
        max_depth: depth,
        max_nodes,
    };

    let result = build(&mut session, &focus, &opts, |p| {
        if verbose {
            let phase = match p.phase {
                Phase::Scanning => "scan",
                Phase::Parsing => "parse",
            };
            eprintln!(
                "[{phase} {}/{}] {}",
                p.current,
                p.total,
                p.detail.unwrap_or("")
            );
        }
    })?;

    let more = if result.has_more { " (truncated)" } else { "" };
    println!(
        "{} of {} documents loaded{more}",
        result.loaded_documents, result.total_documents
    );

    for node in &result.nodes {
        let Some(doc) = node.as_document() else {
            continue;
        };
        let large = if doc.large { " [large]" } else { "" };
        println!("  {}{large}  ({} lines, {} words)", doc.path, doc.lines, doc.words);
        for broken in &doc.broken_links {
            println!("    ✗ broken link: {broken}");
        }
    }

    if !result.externals.is_empty() {
        println!("external domains:");
        for (domain, node) in &result.externals.domains {
            println!("  {domain}  ({} links)", node.link_count);
        }
    }

    let internal = result
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Internal)
        .count();
    println!("{} internal edges, {} total", internal, result.edges.len());

    Ok(())
}
