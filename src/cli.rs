use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build a queryable knowledge graph of a source repository.
///
/// repograph parses every source file with tree-sitter across eleven
/// languages, resolves imports to concrete file-to-file edges, and bulk-loads
/// the result into an embedded graph database.
#[derive(Parser, Debug)]
#[command(name = "repograph", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a repository into a graph database.
    Index {
        /// Path to the repository root.
        path: PathBuf,

        /// Output database directory (default: <path>/.repograph).
        #[arg(long)]
        db: Option<PathBuf>,

        /// Parse worker count (default: hardware concurrency, min 2).
        #[arg(long)]
        workers: Option<usize>,

        /// Print discovered files and phase progress to stderr.
        #[arg(short, long)]
        verbose: bool,

        /// Emit the run summary as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}
