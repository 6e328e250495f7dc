//! "Reveal in file manager" for each supported OS.
//!
//! There is no portable API for opening a folder with an item pre-selected,
//! so every target gets its own call:
//!
//! - Windows: `explorer <dir>` or `explorer /select,"<file>"`
//! - macOS: `open <dir>` or `open -R <file>`
//! - everything else: the default handler (`xdg-open`) on the directory,
//!   or on the parent directory for files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What the file manager should be pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealTarget {
    /// Open this directory.
    Directory(PathBuf),
    /// Open `parent` with `file` selected, where the OS supports it.
    FileInFolder { parent: PathBuf, file: PathBuf },
}

/// Resolves a selected path into a reveal target.
pub fn reveal_target(path: &Path) -> RevealTarget {
    if path.is_dir() {
        return RevealTarget::Directory(path.to_path_buf());
    }
    let parent = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf());
    RevealTarget::FileInFolder {
        parent,
        file: path.to_path_buf(),
    }
}

/// Opens the OS file manager at `path`. The spawned process is not awaited.
pub fn reveal_in_file_manager(path: &Path) -> Result<()> {
    let target = reveal_target(path);
    tracing::info!("Revealing {:?} in the file manager", target);
    spawn_file_manager(&target)
}

#[cfg(target_os = "windows")]
fn spawn_file_manager(target: &RevealTarget) -> Result<()> {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    let mut command = Command::new("explorer");
    match target {
        RevealTarget::Directory(dir) => {
            command.arg(dir);
        }
        // Explorer parses `/select,` itself, so the quoting must not be escaped.
        RevealTarget::FileInFolder { file, .. } => {
            command.raw_arg(format!("/select,\"{}\"", file.display()));
        }
    }
    command
        .spawn()
        .with_context(|| format!("Failed to start explorer for {:?}", target))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn spawn_file_manager(target: &RevealTarget) -> Result<()> {
    use std::process::Command;

    let mut command = Command::new("open");
    match target {
        RevealTarget::Directory(dir) => {
            command.arg(dir);
        }
        RevealTarget::FileInFolder { file, .. } => {
            command.arg("-R").arg(file);
        }
    }
    command
        .spawn()
        .with_context(|| format!("Failed to start Finder for {:?}", target))?;
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn spawn_file_manager(target: &RevealTarget) -> Result<()> {
    let dir = match target {
        RevealTarget::Directory(dir) => dir,
        RevealTarget::FileInFolder { parent, .. } => parent,
    };
    open::that_detached(dir).with_context(|| format!("Failed to open {:?}", dir))
}
