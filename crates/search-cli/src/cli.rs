//! CLI argument parsing for index-search.
//!
//! CLI flags override all other config sources.

use clap::{Args, Parser, Subcommand};

/// Paged full-text search over pre-built Tantivy indexes
#[derive(Parser, Debug)]
#[command(name = "index-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/index-search/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Index directory; repeat for several (the first is the primary index)
    #[arg(short, long = "index", global = true)]
    pub index: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search and print the result as JSON
    Search(SearchArgs),

    /// Show the configured indexes
    Info,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Page to return (1-based)
    #[arg(short, long)]
    pub page: Option<u64>,

    /// Hits per page; 0 returns every hit
    #[arg(short = 'n', long)]
    pub page_size: Option<u64>,

    /// Width of the page-number window
    #[arg(long)]
    pub pages_per_set: Option<u64>,

    /// Sort spec, e.g. "year desc rank desc"
    #[arg(short, long)]
    pub order_by: Option<String>,

    /// Field to restrict to an inclusive range
    #[arg(long)]
    pub limit_to: Option<String>,

    /// Lower range bound (with --limit-to)
    #[arg(long, allow_hyphen_values = true)]
    pub limit_low: Option<String>,

    /// Upper range bound (with --limit-to)
    #[arg(long, allow_hyphen_values = true)]
    pub limit_high: Option<String>,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,
}
