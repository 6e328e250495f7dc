//! Parsing and matching of the semicolon-separated file pattern filter.

use super::error::CoreError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Splits the raw filter input (e.g. `"*.py; *.md;;"`) into its patterns.
///
/// Each part is trimmed and empty parts are dropped, so blank input yields
/// an empty list, which callers treat as "show all".
pub fn parse_pattern_list(raw: &str) -> Vec<String> {
    raw.trim()
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// A compiled set of name patterns used to hide non-matching files.
///
/// Patterns are matched against the entry's file name only, ignoring case.
#[derive(Debug, Clone)]
pub struct NameFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl NameFilter {
    /// Compiles the given patterns. Fails on the first pattern that is not a valid glob.
    pub fn new(patterns: Vec<String>) -> Result<Self, CoreError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| CoreError::GlobPattern(pattern.clone(), e))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| CoreError::GlobPattern(patterns.join(";"), e))?;

        Ok(Self { patterns, set })
    }

    /// Returns `true` if the file name matches at least one pattern.
    pub fn is_match(&self, file_name: &str) -> bool {
        self.set.is_match(file_name)
    }

    /// The patterns joined back with `;`, as shown in the status bar.
    pub fn display(&self) -> String {
        self.patterns.join(";")
    }
}
