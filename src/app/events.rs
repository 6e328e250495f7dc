//! Defines the event and message structures for communication between the backend and frontend.

use serde::Deserialize;

use super::view_model::UiState;

/// Events sent from the command handlers to the event loop (UI thread).
///
/// Each webview-facing variant corresponds to a `window.*` function in the frontend.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render the UI.
    StateUpdate(Box<UiState>),
    /// A non-modal error message to be displayed to the user.
    ShowError(String),
    /// Opens the context menu at the given client coordinates.
    ShowContextMenu { x: f64, y: f64 },
    /// Closes the window and ends the event loop.
    Exit,
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
