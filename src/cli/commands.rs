//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page through a Feedly stream and a Firestore shop listing
#[derive(Parser, Debug)]
#[command(name = "feedly-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true, default_value = "feedly-pager.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch feed pages
    Feeds {
        /// Number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Reset the continuation after this many pages
        #[arg(long)]
        reset_after: Option<usize>,
    },

    /// Fetch shop pages
    Shops {
        /// Number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Validate configuration and acquire a feed credential
    Check,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable rows
    Pretty,
}
