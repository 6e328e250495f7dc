pub mod settings;

use crate::core::SortSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Startup settings read from `config.json`.
///
/// The file is optional and never written by the application. Fields that
/// are missing from the file take their default values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: (f64, f64),
    pub window_position: (f64, f64),
    /// Show dot-files and other hidden entries.
    pub show_hidden: bool,
    pub default_sort: SortSpec,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: (1100.0, 700.0),
            window_position: (100.0, 100.0),
            show_hidden: false,
            default_sort: SortSpec::default(),
        }
    }
}
