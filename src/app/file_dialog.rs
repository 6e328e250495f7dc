//! An abstraction layer for native dialogs to enable testing.

use std::path::{Path, PathBuf};

/// Defines a common interface for the native dialogs the application shows.
/// This allows for a mock implementation during tests, avoiding the need
/// to interact with actual OS dialog windows.
pub trait DialogService: Send + Sync {
    /// Opens a dialog to select a single directory, starting in `start_dir`.
    fn pick_directory(&self, start_dir: &Path) -> Option<PathBuf>;

    /// Shows a modal warning message box.
    fn show_warning(&self, title: &str, message: &str);
}

/// The production implementation that uses the `rfd` crate to show native OS dialogs.
pub struct NativeDialogService;

impl DialogService for NativeDialogService {
    fn pick_directory(&self, start_dir: &Path) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Choose folder")
            .set_directory(start_dir)
            .pick_folder()
    }

    fn show_warning(&self, title: &str, message: &str) {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
