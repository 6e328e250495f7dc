//! The application layer: IPC dispatch, command handlers, state and view model.

pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod helpers;
pub mod proxy;
pub mod shell;
pub mod state;
pub mod view_model;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use events::{IpcMessage, UserEvent};
use file_dialog::DialogService;
use proxy::EventProxy;
use shell::ShellService;
use state::AppState;

/// Parses a message from the WebView and dispatches it to the matching command.
pub fn handle_ipc_message<P, D, S>(
    message: String,
    dialog: Arc<D>,
    shell: Arc<S>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) where
    P: EventProxy,
    D: DialogService + ?Sized,
    S: ShellService + ?Sized,
{
    let msg: IpcMessage = match serde_json::from_str(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::error!("Failed to parse IPC message {:?}: {}", message, e);
            return;
        }
    };
    tracing::debug!("IPC command received: {}", msg.command);

    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "chooseFolder" => commands::choose_folder(&*dialog, proxy, state),
        "setRoot" => match serde_json::from_value::<PathBuf>(msg.payload) {
            Ok(path) => commands::set_root(&*dialog, path, proxy, state),
            Err(e) => tracing::warn!("Invalid setRoot payload: {}", e),
        },
        "updateSearch" => commands::update_search(msg.payload, proxy, state),
        "resetSearch" => commands::reset_search(proxy, state),
        "toggleExpansion" => commands::toggle_expansion(msg.payload, proxy, state),
        "selectNode" => commands::select_node(msg.payload, proxy, state),
        "contextMenu" => commands::open_context_menu(msg.payload, proxy, state),
        "copyPath" => commands::copy_selected_path(&*shell, proxy, state),
        "revealSelected" => commands::reveal_selected(&*shell, state),
        "applyPatternFilter" => commands::apply_pattern_filter(msg.payload, proxy, state),
        "clearPatternFilter" => commands::clear_pattern_filter(proxy, state),
        "sortBy" => commands::sort_by(msg.payload, proxy, state),
        "refresh" => commands::refresh(proxy, state),
        "exit" => commands::exit(proxy),
        _ => tracing::warn!("Unknown IPC command received: {}", msg.command),
    }
}

/// Pushes a `UserEvent` into the WebView.
///
/// Returns `true` when the event loop should stop.
pub fn handle_user_event(event: UserEvent, webview: &wry::WebView) -> bool {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => match serde_json::to_string(&ui_state) {
            Ok(json) => format!("window.render({json});"),
            Err(e) => {
                tracing::error!("Failed to serialize UI state: {}", e);
                return false;
            }
        },
        UserEvent::ShowError(msg) => match serde_json::to_string(&msg) {
            Ok(json) => format!("window.showError({json});"),
            Err(e) => {
                tracing::error!("Failed to serialize error message: {}", e);
                return false;
            }
        },
        UserEvent::ShowContextMenu { x, y } => format!("window.showContextMenu({x}, {y});"),
        UserEvent::Exit => return true,
    };

    if let Err(e) = webview.evaluate_script(&script) {
        tracing::error!("Failed to evaluate script in WebView: {}", e);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::mpsc;
    use tracing_test::traced_test;

    #[derive(Clone)]
    struct ChannelProxy(mpsc::Sender<UserEvent>);

    impl EventProxy for ChannelProxy {
        fn send_event(&self, event: UserEvent) {
            self.0.send(event).expect("Test receiver dropped");
        }
    }

    struct NoDialog;

    impl DialogService for NoDialog {
        fn pick_directory(&self, _start_dir: &Path) -> Option<PathBuf> {
            None
        }
        fn show_warning(&self, _title: &str, _message: &str) {}
    }

    struct NoShell;

    impl ShellService for NoShell {
        fn copy_text(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        fn reveal(&self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn dispatch(message: &str) -> Vec<UserEvent> {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(Mutex::new(AppState::new(
            crate::config::AppConfig::default(),
            dir.path().to_path_buf(),
        )));
        let (tx, rx) = mpsc::channel();
        handle_ipc_message(
            message.to_string(),
            Arc::new(NoDialog),
            Arc::new(NoShell),
            ChannelProxy(tx),
            state,
        );
        rx.try_iter().collect()
    }

    #[test]
    #[traced_test]
    fn test_unknown_command_is_logged() {
        let events = dispatch(r#"{"command":"frobnicate"}"#);
        assert!(events.is_empty());
        assert!(logs_contain("Unknown IPC command received: frobnicate"));
    }

    #[test]
    #[traced_test]
    fn test_malformed_message_is_logged() {
        let events = dispatch("{ not json");
        assert!(events.is_empty());
        assert!(logs_contain("Failed to parse IPC message"));
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let events = dispatch(r#"{"command":"initialize"}"#);
        assert!(matches!(events.as_slice(), [UserEvent::StateUpdate(_)]));
    }

    #[test]
    #[traced_test]
    fn test_cancelled_folder_picker_is_logged() {
        let events = dispatch(r#"{"command":"chooseFolder","payload":null}"#);
        assert!(events.is_empty());
        assert!(logs_contain("User cancelled folder selection."));
    }
}
