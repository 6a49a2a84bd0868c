//! index-search
//!
//! Paged full-text search over pre-built Tantivy indexes.
//!
//! # Usage
//!
//! ```bash
//! index-search --index ./books search "black cat" --page 2 --order-by "year desc"
//! index-search --index ./books --index ./notes info
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/index-search/config.toml)
//! 3. Environment variables (INDEX_SEARCH_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use search_cli::{handle_info, handle_search, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            handle_search(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                &cli.index,
                args,
            )
            .await?;
        }
        Commands::Info => {
            handle_info(cli.config.as_deref(), cli.log_level.as_deref(), &cli.index)?;
        }
    }

    Ok(())
}
