//! Command implementations.
//!
//! Each command loads settings in layered order, applies CLI overrides,
//! then opens the indexes. Logs go to stderr so stdout carries only JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use search_core::{IndexHandle, SearchService};
use search_tantivy::{IndexInfo, TantivyConfig, TantivyConnector, TantivyEngine};
use search_types::{SearchRequest, SearchResult, Settings};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::SearchArgs;

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    index_overrides: &[String],
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if !index_overrides.is_empty() {
        settings.index_paths = index_overrides.to_vec();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Translate search arguments into a request; unset flags stay unset so
/// configured defaults apply.
pub fn build_request(args: &SearchArgs) -> SearchRequest {
    SearchRequest {
        query: args.query.clone(),
        page: args.page,
        page_size: args.page_size,
        pages_per_set: args.pages_per_set,
        order_by: args.order_by.clone(),
        limit_to: args.limit_to.clone(),
        limit_low: args.limit_low.clone(),
        limit_high: args.limit_high.clone(),
    }
}

/// Open the indexes and run one search.
pub async fn run_search(settings: &Settings, args: &SearchArgs) -> Result<SearchResult> {
    let connector = Arc::new(TantivyConnector::new(TantivyConfig::from_settings(settings)));
    let handle = IndexHandle::connect(connector).context("Failed to open indexes")?;
    let service = SearchService::new(Arc::new(handle), settings.search_defaults());

    let timeout = args
        .timeout_ms
        .or(settings.search_timeout_ms)
        .map(Duration::from_millis);
    debug!(query = %args.query, ?timeout, "Running search");

    let result = service
        .search_async(build_request(args), timeout)
        .await
        .context("Search failed")?;

    info!(
        total_hits = result.total_hits,
        returned = result.hits.len(),
        search_secs = result.search_duration,
        "Search finished"
    );
    Ok(result)
}

/// `search` command: print the result as JSON on stdout.
pub async fn handle_search(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    index_overrides: &[String],
    args: SearchArgs,
) -> Result<()> {
    let settings = load_settings(config_path, log_level_override, index_overrides)?;
    init_logging(&settings.log_level)?;

    let result = run_search(&settings, &args).await?;
    println!("{}", to_json(&result, args.compact)?);
    Ok(())
}

/// Summaries of the configured indexes.
pub fn index_info(settings: &Settings) -> Result<Vec<IndexInfo>> {
    let engine = TantivyEngine::open(&TantivyConfig::from_settings(settings))
        .context("Failed to open indexes")?;
    Ok(engine.info())
}

/// `info` command: print index summaries as JSON on stdout.
pub fn handle_info(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    index_overrides: &[String],
) -> Result<()> {
    let settings = load_settings(config_path, log_level_override, index_overrides)?;
    init_logging(&settings.log_level)?;

    let info = index_info(&settings)?;
    println!("{}", to_json(&info, false)?);
    Ok(())
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize output")
}
