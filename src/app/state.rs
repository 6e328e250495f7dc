//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::search::{expand_matching_under, normalize_query, SEARCH_NODE_LIMIT};
use crate::core::FileSystemModel;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How long the "Copied: ..." message stays in the status bar.
pub const COPY_STATUS_MS: u64 = 2500;
/// How long the "Filter: ..." message stays in the status bar.
pub const FILTER_SET_STATUS_MS: u64 = 4000;
/// How long the "File pattern filter cleared" message stays in the status bar.
pub const FILTER_CLEAR_STATUS_MS: u64 = 2500;

/// The message currently shown in the status bar.
///
/// `serial` increases on every change so the UI can tell a repeated
/// message apart from a re-render of the same one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    /// `None` keeps the message until it is replaced.
    pub timeout_ms: Option<u64>,
    pub serial: u64,
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` so the IPC handler, the
/// file-drop handler and the event loop can share it.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Directory listings, pattern filter and sort order.
    pub model: FileSystemModel,
    /// The absolute path of the directory shown as the tree root.
    pub root: PathBuf,
    /// The raw text of the search box.
    pub search_query: String,
    /// Directories that are expanded in the tree.
    pub expanded_dirs: HashSet<PathBuf>,
    /// The single selected row, if any.
    pub selected_path: Option<PathBuf>,
    pub status: StatusMessage,
    /// `true` if the last search stopped at the node limit.
    pub search_truncated: bool,
    /// Bumped whenever the search text is cleared by anything but typing,
    /// so the UI knows to overwrite its search box even while it has focus.
    pub search_reset_serial: u64,
}

impl Default for AppState {
    /// Creates the startup state: settings from disk, the working directory as root.
    fn default() -> Self {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {:#}. Using default settings.", e);
            AppConfig::default()
        });
        Self::new(config, startup_directory())
    }
}

impl AppState {
    pub fn new(config: AppConfig, root: PathBuf) -> Self {
        let model = FileSystemModel::new(config.show_hidden, config.default_sort);
        let mut state = Self {
            config,
            model,
            root: PathBuf::new(),
            search_query: String::new(),
            expanded_dirs: HashSet::new(),
            selected_path: None,
            status: StatusMessage::default(),
            search_truncated: false,
            search_reset_serial: 0,
        };
        state.reset_root(root);
        state
    }

    /// Replaces the status bar message.
    pub fn set_status(&mut self, text: impl Into<String>, timeout_ms: Option<u64>) {
        self.status = StatusMessage {
            text: text.into(),
            timeout_ms,
            serial: self.status.serial + 1,
        };
    }

    /// Shows `root` as the new tree root. The caller has validated it is a directory.
    pub fn reset_root(&mut self, root: PathBuf) {
        self.set_status(format!("Root: {}", root.display()), None);
        self.root = root;
        self.selected_path = None;
        self.clear_search();
    }

    /// Empties the search box from the backend side and collapses the tree.
    pub fn clear_search(&mut self) {
        self.search_reset_serial += 1;
        self.set_search_query(String::new());
    }

    /// Collapses the tree, then expands whatever matches the new query.
    pub fn set_search_query(&mut self, raw: String) {
        self.search_query = raw;
        self.expanded_dirs.clear();
        self.search_truncated = false;

        let needle = normalize_query(&self.search_query);
        if needle.is_empty() {
            return;
        }
        let outcome =
            expand_matching_under(&mut self.model, &self.root, &needle, SEARCH_NODE_LIMIT);
        self.expanded_dirs = outcome.expanded;
        self.search_truncated = outcome.truncated;
    }

    /// Selects `path` if it still exists below the root, clears the selection for `None`.
    /// Returns whether the selection changed.
    pub fn select(&mut self, path: Option<PathBuf>) -> bool {
        let next = match path {
            Some(p) if self.is_within_root(&p) && self.model.is_valid(&p) => Some(p),
            Some(p) => {
                tracing::debug!("Ignoring selection of stale or foreign path {:?}", p);
                return false;
            }
            None => None,
        };
        let changed = self.selected_path != next;
        self.selected_path = next;
        changed
    }

    /// Drops the selection if the pattern filter now hides it.
    pub fn prune_hidden_selection(&mut self) {
        if let Some(path) = &self.selected_path {
            if !self.model.passes_filter(path) {
                self.selected_path = None;
            }
        }
    }

    pub fn is_within_root(&self, path: &Path) -> bool {
        path.starts_with(&self.root) && path != self.root
    }
}

/// The directory shown on startup: the working directory, else home, else the filesystem root.
pub fn startup_directory() -> PathBuf {
    std::env::current_dir()
        .ok()
        .filter(|dir| dir.is_dir())
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("/"))
}
