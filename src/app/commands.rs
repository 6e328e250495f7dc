//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! Handlers mutate the `AppState`, call the native services through their
//! traits, and send `UserEvent`s back to the UI.

use super::events::UserEvent;
use super::file_dialog::DialogService;
use super::helpers::{notify, with_state_and_notify};
use super::proxy::EventProxy;
use super::shell::ShellService;
use super::state::{AppState, COPY_STATUS_MS, FILTER_CLEAR_STATUS_MS, FILTER_SET_STATUS_MS};
use crate::core::{parse_pattern_list, NameFilter, SortSpec};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Payload of the `contextMenu` command: the row under the cursor and the click position.
#[derive(Deserialize, Debug)]
pub struct ContextMenuRequest {
    pub path: Option<PathBuf>,
    pub x: f64,
    pub y: f64,
}

/// Handles the initial request for state from the frontend when it loads.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |_| {});
}

/// Opens the native folder picker at the current root and switches to the chosen folder.
pub fn choose_folder<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let start = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.root.clone()
    };

    // The lock is released while the modal picker is open.
    match dialog.pick_directory(&start) {
        Some(folder) => set_root(dialog, folder, proxy, state),
        None => tracing::info!("User cancelled folder selection."),
    }
}

/// Makes `folder` the tree root.
///
/// Relative paths resolve against the working directory. Anything that is
/// not a directory is rejected with a warning dialog and leaves the state
/// untouched.
pub fn set_root<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    folder: PathBuf,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let folder = absolute_path(&folder);
    if !folder.is_dir() {
        tracing::warn!("Rejected {:?} as root: not a directory", folder);
        dialog.show_warning(
            "Not a folder",
            &format!("That path is not a directory:\n{}", folder.display()),
        );
        return;
    }

    tracing::info!("Switching root to {:?}", folder);
    with_state_and_notify(&state, &proxy, |s| {
        s.model.invalidate();
        s.reset_root(folder);
    });
}

/// Updates the search text: collapses the tree and expands the matches.
pub fn update_search<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(query) = serde_json::from_value::<String>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| s.set_search_query(query));
    } else {
        tracing::warn!("Failed to deserialize search text from payload: {:?}", payload);
    }
}

/// Clears the search box, which collapses the whole tree.
pub fn reset_search<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| s.clear_search());
}

/// Toggles the expanded/collapsed state of a directory in the tree.
pub fn toggle_expansion<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(path) = serde_json::from_value::<PathBuf>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            if !s.is_within_root(&path) || !path.is_dir() {
                return;
            }
            if !s.expanded_dirs.remove(&path) {
                s.expanded_dirs.insert(path);
            }
        });
    } else {
        tracing::warn!("Failed to deserialize path string from payload: {:?}", payload);
    }
}

/// Selects a row, or clears the selection for a `null` payload.
pub fn select_node<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(path) = serde_json::from_value::<Option<PathBuf>>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            s.select(path);
        });
    } else {
        tracing::warn!("Failed to deserialize selection from payload: {:?}", payload);
    }
}

/// Right-click: selects the row under the cursor (if valid) and opens the context menu.
pub fn open_context_menu<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(request) = serde_json::from_value::<ContextMenuRequest>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            if let Some(path) = request.path {
                s.select(Some(path));
            }
        });
        proxy.send_event(UserEvent::ShowContextMenu {
            x: request.x,
            y: request.y,
        });
    } else {
        tracing::warn!("Failed to deserialize context menu request: {:?}", payload);
    }
}

/// Copies the selected path to the clipboard. Does nothing without a selection.
pub fn copy_selected_path<P: EventProxy, S: ShellService + ?Sized>(
    shell: &S,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(path) = selected_path(&state) else {
        return;
    };
    let text = path.display().to_string();

    match shell.copy_text(&text) {
        Ok(()) => with_state_and_notify(&state, &proxy, |s| {
            s.set_status(format!("Copied: {text}"), Some(COPY_STATUS_MS));
        }),
        Err(e) => tracing::warn!("Failed to copy {:?} to the clipboard: {:#}", text, e),
    }
}

/// Opens the OS file manager at the selected directory, or at the folder of the selected file.
pub fn reveal_selected<S: ShellService + ?Sized>(shell: &S, state: Arc<Mutex<AppState>>) {
    let Some(path) = selected_path(&state) else {
        return;
    };
    if let Err(e) = shell.reveal(&path) {
        tracing::warn!("Failed to reveal {:?}: {:#}", path, e);
    }
}

/// Applies the semicolon-separated pattern list from the filter dialog.
///
/// Blank input clears the filter. An invalid pattern keeps the current
/// filter and reports the problem to the UI.
pub fn apply_pattern_filter<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(raw) = serde_json::from_value::<String>(payload.clone()) else {
        tracing::warn!("Failed to deserialize pattern list from payload: {:?}", payload);
        return;
    };

    let patterns = parse_pattern_list(&raw);
    if patterns.is_empty() {
        clear_pattern_filter(proxy, state);
        return;
    }

    match NameFilter::new(patterns) {
        Ok(filter) => with_state_and_notify(&state, &proxy, |s| {
            let filter_display = filter.display();
            tracing::info!("Applying file pattern filter {}", filter_display);
            s.model.set_name_filter(Some(filter));
            s.prune_hidden_selection();
            s.set_status(format!("Filter: {filter_display}"), Some(FILTER_SET_STATUS_MS));
        }),
        Err(e) => {
            tracing::warn!("Rejected pattern filter {:?}: {}", raw, e);
            proxy.send_event(UserEvent::ShowError(e.to_string()));
        }
    }
}

/// Removes the pattern filter unconditionally.
pub fn clear_pattern_filter<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.model.set_name_filter(None);
        s.set_status("File pattern filter cleared", Some(FILTER_CLEAR_STATUS_MS));
    });
}

/// Changes the sort column and order of every listing.
pub fn sort_by<P: EventProxy>(payload: serde_json::Value, proxy: P, state: Arc<Mutex<AppState>>) {
    if let Ok(sort) = serde_json::from_value::<SortSpec>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| s.model.set_sort(sort));
    } else {
        tracing::warn!("Failed to deserialize sort order from payload: {:?}", payload);
    }
}

/// Re-reads the file system: drops cached listings and forgets vanished paths.
pub fn refresh<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");
    let s = &mut *state_guard;

    s.model.invalidate();
    s.expanded_dirs.retain(|dir| dir.is_dir());
    if s.selected_path.as_deref().is_some_and(|p| !p.exists()) {
        s.selected_path = None;
    }
    notify(s, &proxy);
}

/// Asks the event loop to close the window.
pub fn exit<P: EventProxy>(proxy: P) {
    tracing::info!("Exit requested from the menu.");
    proxy.send_event(UserEvent::Exit);
}

fn selected_path(state: &Arc<Mutex<AppState>>) -> Option<PathBuf> {
    state
        .lock()
        .expect("Mutex was poisoned. This should not happen.")
        .selected_path
        .clone()
}

fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
