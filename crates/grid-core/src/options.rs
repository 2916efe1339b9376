//! Configuration surface of the grid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use grid_format::LocalClock;

use crate::error::{GridError, Result};

/// Recognized grid options. Missing keys in a config file take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Refresh automatically whenever an option or the data source changes.
    pub auto_refresh: bool,
    pub show_friendly_names: bool,
    /// Convert universal timestamps to the local clock before rendering.
    pub show_local_times: bool,
    /// Minutes east of UTC used as the local clock; the host zone when unset.
    pub utc_offset_minutes: Option<i32>,
    pub show_id_column: bool,
    pub show_index_column: bool,
    pub column_order: Vec<String>,
    pub show_all_ordered_columns: bool,
    pub show_unordered_columns: bool,
    pub filter_text: String,
    /// Columns the filter looks at; all columns when empty.
    pub filter_columns: Vec<String>,
    pub entity_reference_clickable: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            show_friendly_names: false,
            show_local_times: false,
            utc_offset_minutes: None,
            show_id_column: true,
            show_index_column: true,
            column_order: Vec::new(),
            show_all_ordered_columns: false,
            show_unordered_columns: true,
            filter_text: String::new(),
            filter_columns: Vec::new(),
            entity_reference_clickable: false,
        }
    }
}

impl GridOptions {
    /// Clock for local-time mode, or `None` when timestamps render as stored.
    pub fn local_clock(&self) -> Option<LocalClock> {
        if !self.show_local_times {
            return None;
        }
        Some(
            self.utc_offset_minutes
                .and_then(LocalClock::from_offset_minutes)
                .unwrap_or_default(),
        )
    }
}

/// Loads options from a TOML file.
pub fn load_options(path: &Path) -> Result<GridOptions> {
    let config_error = |message: String| GridError::Config {
        path: path.to_path_buf(),
        message,
    };
    let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let options = toml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
    tracing::info!(path = %path.display(), "loaded grid options");
    Ok(options)
}

/// Splits a comma-separated list of column names.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
