//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! Only the visible part of the tree is materialized: the root's children
//! plus the children of every expanded directory. Collapsed directories are
//! sent without children and the UI shows an expander for them.

use crate::core::search::{name_matches, normalize_query};
use crate::core::{FsEntry, SortSpec};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use super::state::AppState;

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub root: String,
    pub tree: Vec<TreeNode>,
    pub search_query: String,
    pub search_truncated: bool,
    /// Changes when the backend cleared the search text; the UI then overwrites its search box.
    pub search_reset_serial: u64,
    /// The active pattern filter joined with `;`, if any.
    pub pattern_filter: Option<String>,
    pub selected_path: Option<String>,
    pub sort: SortSpec,
    pub status: StatusView,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StatusView {
    pub text: String,
    pub timeout_ms: Option<u64>,
    pub serial: u64,
}

/// A serializable representation of a single row in the file tree.
#[derive(Serialize, Clone, Debug)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    /// Human-readable size, files only.
    pub size: Option<String>,
    pub kind: String,
    pub modified: Option<String>,
    pub is_expanded: bool,
    pub is_match: bool,
    pub is_selected: bool,
    pub children: Vec<TreeNode>,
}

/// Creates the complete `UiState` from the current `AppState`.
///
/// Takes the state mutably because expanded directories may not have been listed yet.
pub fn generate_ui_state(state: &mut AppState) -> UiState {
    let needle = normalize_query(&state.search_query);
    let root = state.root.clone();
    let tree = build_level(state, &root, &needle);

    UiState {
        root: root.display().to_string(),
        tree,
        search_query: state.search_query.clone(),
        search_truncated: state.search_truncated,
        search_reset_serial: state.search_reset_serial,
        pattern_filter: state.model.name_filter().map(|f| f.display()),
        selected_path: state
            .selected_path
            .as_ref()
            .map(|p| p.display().to_string()),
        sort: state.model.sort(),
        status: StatusView {
            text: state.status.text.clone(),
            timeout_ms: state.status.timeout_ms,
            serial: state.status.serial,
        },
    }
}

fn build_level(state: &mut AppState, dir: &Path, needle: &str) -> Vec<TreeNode> {
    let entries = state.model.entries(dir);
    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        let is_expanded = entry.is_directory && state.expanded_dirs.contains(&entry.path);
        let children = if is_expanded {
            build_level(state, &entry.path, needle)
        } else {
            Vec::new()
        };
        let is_selected = state.selected_path.as_deref() == Some(entry.path.as_path());
        nodes.push(to_tree_node(&entry, is_expanded, is_selected, needle, children));
    }
    nodes
}

fn to_tree_node(
    entry: &FsEntry,
    is_expanded: bool,
    is_selected: bool,
    needle: &str,
    children: Vec<TreeNode>,
) -> TreeNode {
    TreeNode {
        name: entry.name.clone(),
        path: entry.path.display().to_string(),
        is_directory: entry.is_directory,
        size: (!entry.is_directory).then(|| format_size(entry.size)),
        kind: entry.kind(),
        modified: entry.modified.map(|time| {
            DateTime::<Local>::from(time)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        }),
        is_expanded,
        is_match: name_matches(&entry.name, needle),
        is_selected,
        children,
    }
}

/// Formats a byte count the way file managers do (`512 bytes`, `1.5 KB`, ...).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
