use anyhow::Result;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "FileTreeViewer";
const CONFIG_FILE: &str = "config.json";
/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FILE_TREE_VIEWER_CONFIG";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "filetreeviewer", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file, honoring the environment override.
pub fn get_config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the application configuration.
///
/// A missing file yields the defaults. A file that cannot be parsed is
/// reported with a warning and also falls back to the defaults, so a broken
/// settings file never prevents startup.
pub fn load_config(path_override: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path_override {
        Some(path) => path.to_path_buf(),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if !config_path.exists() {
        tracing::info!(
            "No config file at {:?}, using default settings",
            config_path
        );
        return Ok(AppConfig::default());
    }

    let config_content = fs::read_to_string(&config_path)?;
    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.filetreeviewer.FileTreeViewer/
// Linux:   ~/.config/filetreeviewer/
// Windows: %APPDATA%/filetreeviewer/FileTreeViewer/config/
