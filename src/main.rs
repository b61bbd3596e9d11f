mod cache;
mod commands;
mod graph;
mod layout;
mod parser;
mod scanner;
mod session;
mod tui;
mod vfs;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::graph::build::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};

#[derive(Parser, Debug)]
#[command(
    name = "docmap",
    about = "An interactive link graph for directories of markdown documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive canvas centered on a document
    View {
        /// Focus document, relative to the root
        focus: String,
        /// Document root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Link-following depth limit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,
        /// Cap on documents loaded per build
        #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
        max_nodes: usize,
        /// Hide the external-link cluster
        #[arg(long)]
        no_external: bool,
    },
    /// Build the graph once and print a text summary
    Build {
        /// Focus document, relative to the root
        focus: String,
        /// Document root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Link-following depth limit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,
        /// Cap on documents loaded per build
        #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
        max_nodes: usize,
        /// Print per-file progress while building
        #[arg(long)]
        verbose: bool,
    },
    /// List files linking to a document
    Backlinks {
        /// Target document, relative to the root
        focus: String,
        /// Document root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::View {
            focus,
            root,
            depth,
            max_nodes,
            no_external,
        } => commands::view::run(focus, root, depth, max_nodes, no_external),
        Command::Build {
            focus,
            root,
            depth,
            max_nodes,
            verbose,
        } => commands::build::run(focus, root, depth, max_nodes, verbose),
        Command::Backlinks { focus, root } => commands::backlinks::run(focus, root),
    }
}
