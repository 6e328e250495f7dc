//! Clipboard and file-manager integration behind a mockable trait.

use anyhow::Result;
use std::path::Path;
use std::sync::Mutex;

use crate::platform;

/// The desktop services a command handler may call.
pub trait ShellService: Send + Sync {
    /// Replaces the system clipboard content with plain text.
    fn copy_text(&self, text: &str) -> Result<()>;

    /// Opens the OS file manager at `path` (see [`platform::reveal_in_file_manager`]).
    fn reveal(&self, path: &Path) -> Result<()>;
}

/// The production implementation backed by `arboard` and the platform helpers.
#[derive(Default)]
pub struct NativeShellService {
    // On X11 the clipboard owner has to stay alive to serve paste requests,
    // so the handle is created once and kept for the application lifetime.
    clipboard: Mutex<Option<arboard::Clipboard>>,
}

impl ShellService for NativeShellService {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|_| anyhow::anyhow!("Clipboard mutex was poisoned"))?;
        if guard.is_none() {
            *guard = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        Ok(())
    }

    fn reveal(&self, path: &Path) -> Result<()> {
        platform::reveal_in_file_manager(path)
    }
}
