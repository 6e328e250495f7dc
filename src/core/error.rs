//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Covers everything that can go wrong while listing directories for the
/// file-system model or while compiling the pattern filter.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from reading a directory level.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a directory walk failure reported by the `ignore` walker.
    #[error("Failed to list {1}: {0}")]
    Walk(#[source] ignore::Error, PathBuf),

    /// Represents an error during the parsing or building of a glob pattern.
    #[error("Invalid file pattern '{0}': {1}")]
    GlobPattern(String, #[source] globset::Error),

    /// A directory listing was abandoned because it exceeded the caller's budget.
    #[error("{0} has more than {1} entries")]
    TooManyEntries(PathBuf, usize),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),
}
