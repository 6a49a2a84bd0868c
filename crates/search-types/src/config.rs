//! Configuration loading for index-search.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/index-search/config.toml`
//! (platform equivalent via `directories`).

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::request::{SearchDefaults, DEFAULT_PAGES_PER_SET, DEFAULT_PAGE_SIZE};

/// Environment variable prefix, e.g. `INDEX_SEARCH_PAGE_SIZE=25`.
pub const ENV_PREFIX: &str = "INDEX_SEARCH";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Index directories; the first one is the primary index
    #[serde(default)]
    pub index_paths: Vec<String>,

    /// Default hits per page (0 = unpaginated)
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Default pager window width
    #[serde(default = "default_pages_per_set")]
    pub pages_per_set: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional deadline for a whole search, in milliseconds
    #[serde(default)]
    pub search_timeout_ms: Option<u64>,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_pages_per_set() -> u64 {
    DEFAULT_PAGES_PER_SET
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_paths: Vec::new(),
            page_size: default_page_size(),
            pages_per_set: default_pages_per_set(),
            log_level: default_log_level(),
            search_timeout_ms: None,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/index-search/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (INDEX_SEARCH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(cli_config_path, ENV_PREFIX)
    }

    fn load_with_env_prefix(
        cli_config_path: Option<&str>,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "index-search")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("page_size", default_page_size() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("pages_per_set", default_pages_per_set() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // INDEX_SEARCH_PAGE_SIZE, INDEX_SEARCH_INDEX_PATHS=a,b
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("index_paths")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Check values that deserialize fine but cannot be searched with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_paths.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one index path is required".to_string(),
            ));
        }
        if self.index_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid("index paths must not be blank".to_string()));
        }
        if self.pages_per_set == 0 {
            return Err(ConfigError::Invalid("pages_per_set must be > 0".to_string()));
        }
        if self.search_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "search_timeout_ms must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Index paths with a leading `~/` expanded.
    pub fn expanded_index_paths(&self) -> Vec<PathBuf> {
        self.index_paths.iter().map(|p| expand_home(p)).collect()
    }

    /// Defaults handed to the search orchestrator.
    pub fn search_defaults(&self) -> SearchDefaults {
        SearchDefaults {
            page_size: self.page_size,
            pages_per_set: self.pages_per_set,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
