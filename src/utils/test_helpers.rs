//! Shared helpers for unit and integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
///
/// Wrapped in a `Once` so the global subscriber is set exactly one time,
/// even when tests run in parallel. Honors `RUST_LOG`.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Creates `relative` below `root` (with parent directories) and writes `content`.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}
