//! index-search command-line host.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (search, info)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, SearchArgs};
pub use commands::{
    build_request, handle_info, handle_search, index_info, init_logging, load_settings,
    run_search,
};
