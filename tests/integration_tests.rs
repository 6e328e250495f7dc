//! Integration tests for the File Tree Viewer application.
//!
//! Every test drives the application through `app::handle_ipc_message`, the
//! same entry point the WebView uses, with mock dialog and shell services.

use file_tree_viewer::app::{
    self, events::UserEvent, file_dialog::DialogService, proxy::EventProxy, shell::ShellService,
    state::AppState, view_model::UiState,
};
use file_tree_viewer::config::AppConfig;
use file_tree_viewer::core::SEARCH_NODE_LIMIT;
use file_tree_viewer::utils::test_helpers::{setup_test_logging, write_file};
use serde_json::json;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use tempfile::TempDir;

/// Contains the test infrastructure.
mod helpers {
    use super::*;

    /// A test double for the `EventLoopProxy` using a std MPSC channel.
    #[derive(Clone)]
    pub struct TestEventProxy {
        pub sender: mpsc::Sender<UserEvent>,
    }

    impl EventProxy for TestEventProxy {
        fn send_event(&self, event: UserEvent) {
            if let Err(e) = self.sender.send(event) {
                // The receiver lives as long as the harness; losing it is a test setup error.
                panic!("Test receiver dropped: {}", e);
            }
        }
    }

    #[derive(Default)]
    pub struct MockDialog {
        pub pick: Mutex<Option<PathBuf>>,
        pub warnings: Mutex<Vec<(String, String)>>,
    }

    impl DialogService for MockDialog {
        fn pick_directory(&self, _start_dir: &Path) -> Option<PathBuf> {
            self.pick.lock().unwrap().clone()
        }

        fn show_warning(&self, title: &str, message: &str) {
            self.warnings
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
        }
    }

    #[derive(Default)]
    pub struct MockShell {
        pub clipboard: Mutex<Option<String>>,
        pub revealed: Mutex<Vec<PathBuf>>,
    }

    impl ShellService for MockShell {
        fn copy_text(&self, text: &str) -> anyhow::Result<()> {
            *self.clipboard.lock().unwrap() = Some(text.to_string());
            Ok(())
        }

        fn reveal(&self, path: &Path) -> anyhow::Result<()> {
            self.revealed.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    /// `TestHarness` sets up a complete, isolated environment for each test case.
    pub struct TestHarness {
        pub state: Arc<Mutex<AppState>>,
        pub proxy: TestEventProxy,
        pub event_rx: mpsc::Receiver<UserEvent>,
        pub dialog: Arc<MockDialog>,
        pub shell: Arc<MockShell>,
        pub root_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        pub fn new() -> Self {
            setup_test_logging();
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let root_path = temp_dir.path().to_path_buf();
            let (event_tx, event_rx) = mpsc::channel();

            let state = AppState::new(AppConfig::default(), root_path.clone());

            Self {
                state: Arc::new(Mutex::new(state)),
                proxy: TestEventProxy { sender: event_tx },
                event_rx,
                dialog: Arc::new(MockDialog::default()),
                shell: Arc::new(MockShell::default()),
                root_path,
                _temp_dir: temp_dir,
            }
        }

        /// Sends an IPC message exactly as the WebView would.
        pub fn send(&self, command: &str, payload: serde_json::Value) {
            let message = json!({ "command": command, "payload": payload }).to_string();
            app::handle_ipc_message(
                message,
                self.dialog.clone(),
                self.shell.clone(),
                self.proxy.clone(),
                self.state.clone(),
            );
        }

        pub fn events(&self) -> Vec<UserEvent> {
            self.event_rx.try_iter().collect()
        }

        pub fn latest_ui(&self) -> UiState {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    UserEvent::StateUpdate(ui) => Some(*ui),
                    _ => None,
                })
                .last()
                .expect("No StateUpdate event was sent")
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.root_path.join(relative)
        }
    }

    /// Flattens the visible rows into `indent + name` lines.
    pub fn visible_rows(ui: &UiState) -> Vec<String> {
        fn walk(nodes: &[file_tree_viewer::app::view_model::TreeNode], depth: usize, out: &mut Vec<String>) {
            for node in nodes {
                out.push(format!("{}{}", "  ".repeat(depth), node.name));
                if node.is_expanded {
                    walk(&node.children, depth + 1, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&ui.tree, 0, &mut out);
        out
    }
}

use helpers::{visible_rows, TestHarness};

fn project(harness: &TestHarness) {
    write_file(&harness.root_path, "app/main.py", "print('hello')");
    write_file(&harness.root_path, "app/models/user.py", "");
    write_file(&harness.root_path, "app/models/README.md", "");
    write_file(&harness.root_path, "docs/index.md", "");
    write_file(&harness.root_path, "notes.txt", "");
    write_file(&harness.root_path, ".env", "SECRET=1");
}

#[test]
fn test_startup_lists_root_level_without_hidden_entries() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("initialize", json!(null));

    let ui = harness.latest_ui();
    assert_eq!(visible_rows(&ui), vec!["app", "docs", "notes.txt"]);
    assert_eq!(ui.status.text, format!("Root: {}", harness.root_path.display()));
    assert_eq!(ui.status.timeout_ms, None);
}

#[test]
fn test_search_then_clear_collapses_everything() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("updateSearch", json!("USER"));
    let ui = harness.latest_ui();
    assert_eq!(
        visible_rows(&ui),
        vec![
            "app",
            "  models",
            "    README.md",
            "    user.py",
            "  main.py",
            "docs",
            "notes.txt"
        ]
    );

    harness.send("updateSearch", json!("   "));
    let ui = harness.latest_ui();
    assert_eq!(visible_rows(&ui), vec!["app", "docs", "notes.txt"]);
}

#[test]
fn test_search_for_directory_name_expands_that_directory() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("updateSearch", json!("models"));

    let ui = harness.latest_ui();
    let app_node = &ui.tree[0];
    let models = &app_node.children[0];
    assert!(app_node.is_expanded);
    assert!(models.is_expanded);
    assert!(models.is_match);
}

#[test]
fn test_search_walk_stops_at_node_limit() {
    let harness = TestHarness::new();
    fs::create_dir(harness.path("bulk")).unwrap();
    for i in 0..SEARCH_NODE_LIMIT {
        fs::write(harness.path(&format!("bulk/file_{i:05}.dat")), "").unwrap();
    }
    write_file(&harness.root_path, "zzz/needle.txt", "");

    harness.send("updateSearch", json!("needle"));

    let ui = harness.latest_ui();
    assert!(ui.search_truncated);
    let zzz = ui.tree.iter().find(|n| n.name == "zzz").unwrap();
    assert!(!zzz.is_expanded);
}

#[test]
fn test_filter_dialog_flow() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("applyPatternFilter", json!(" *.py ; ;*.MD "));
    harness.send("toggleExpansion", json!(harness.path("app")));
    harness.send("toggleExpansion", json!(harness.path("app/models")));
    let ui = harness.latest_ui();
    assert_eq!(ui.pattern_filter.as_deref(), Some("*.py;*.MD"));
    assert_eq!(
        visible_rows(&ui),
        vec!["app", "  models", "    README.md", "    user.py", "  main.py", "docs"]
    );
    assert_eq!(ui.status.text, "Filter: *.py;*.MD");
    assert_eq!(ui.status.timeout_ms, Some(4000));

    harness.send("applyPatternFilter", json!(""));
    let ui = harness.latest_ui();
    assert_eq!(ui.pattern_filter, None);
    assert!(visible_rows(&ui).contains(&"notes.txt".to_string()));
    assert_eq!(ui.status.text, "File pattern filter cleared");
    assert_eq!(ui.status.timeout_ms, Some(2500));
}

#[test]
fn test_invalid_filter_reports_error() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("applyPatternFilter", json!("{unclosed"));

    let events = harness.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, UserEvent::ShowError(msg) if msg.contains("{unclosed"))));
    assert!(harness.state.lock().unwrap().model.name_filter().is_none());
}

#[test]
fn test_context_menu_copy_and_reveal() {
    let harness = TestHarness::new();
    project(&harness);
    let target = harness.path("app/main.py");

    harness.send("contextMenu", json!({ "path": target, "x": 40.0, "y": 80.0 }));
    let events = harness.events();
    assert!(matches!(
        events.last(),
        Some(UserEvent::ShowContextMenu { .. })
    ));

    harness.send("copyPath", json!(null));
    assert_eq!(
        *harness.shell.clipboard.lock().unwrap(),
        Some(target.display().to_string())
    );
    let ui = harness.latest_ui();
    assert_eq!(ui.status.text, format!("Copied: {}", target.display()));

    harness.send("revealSelected", json!(null));
    assert_eq!(*harness.shell.revealed.lock().unwrap(), vec![target]);
}

#[test]
fn test_choose_folder_and_rejected_drop() {
    let harness = TestHarness::new();
    project(&harness);
    *harness.dialog.pick.lock().unwrap() = Some(harness.path("docs"));

    harness.send("chooseFolder", json!(null));
    let ui = harness.latest_ui();
    assert_eq!(visible_rows(&ui), vec!["index.md"]);

    harness.send("setRoot", json!(harness.path("notes.txt")));
    assert!(harness.events().is_empty());
    let warnings = harness.dialog.warnings.lock().unwrap().clone();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].0, "Not a folder");
    assert_eq!(harness.state.lock().unwrap().root, harness.path("docs"));
}

#[test]
#[serial]
fn test_relative_root_resolves_against_working_directory() {
    let harness = TestHarness::new();
    project(&harness);
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&harness.root_path).unwrap();

    harness.send("setRoot", json!("app"));

    std::env::set_current_dir(previous).unwrap();
    let state = harness.state.lock().unwrap();
    assert!(state.root.is_absolute());
    assert!(state.root.ends_with("app"));
}

#[test]
fn test_sort_by_name_descending_reverses_everything() {
    let harness = TestHarness::new();
    project(&harness);

    harness.send("sortBy", json!({ "column": "name", "order": "descending" }));

    let ui = harness.latest_ui();
    assert_eq!(visible_rows(&ui), vec!["notes.txt", "docs", "app"]);
}

#[test]
fn test_unknown_command_and_garbage_are_ignored() {
    let harness = TestHarness::new();

    harness.send("launchRockets", json!(null));
    app::handle_ipc_message(
        "not json".to_string(),
        harness.dialog.clone(),
        harness.shell.clone(),
        harness.proxy.clone(),
        harness.state.clone(),
    );

    assert!(harness.events().is_empty());
}

#[test]
fn test_exit_command() {
    let harness = TestHarness::new();
    harness.send("exit", json!(null));
    assert!(matches!(harness.events().as_slice(), [UserEvent::Exit]));
}
