//! Engine configuration.

use std::path::PathBuf;

use search_types::Settings;

/// Which index directories to open.
#[derive(Debug, Clone, Default)]
pub struct TantivyConfig {
    /// Index directories; the first is the primary index.
    pub index_paths: Vec<PathBuf>,
}

impl TantivyConfig {
    pub fn new(index_paths: Vec<PathBuf>) -> Self {
        Self { index_paths }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.expanded_index_paths())
    }

    pub fn with_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_paths.push(path.into());
        self
    }
}
