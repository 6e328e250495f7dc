//! A lazily populated model of the local file system.
//!
//! Directory levels are read on first access and cached until the model is
//! invalidated. The pattern filter and the sort order are applied when
//! children are requested, so changing either never touches the disk.

use super::error::CoreError;
use super::patterns::NameFilter;
use super::{SortColumn, SortOrder, SortSpec};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The read-only view of a tree used by the name-filter search.
///
/// Nodes are identified by their absolute path.
pub trait TreeModel {
    /// The display name of a node.
    fn file_name(&self, path: &Path) -> String;

    /// Returns `true` if the node can have children.
    fn is_dir(&self, path: &Path) -> bool;

    /// The visible children of a directory node, in display order.
    ///
    /// Returns `None` without finishing the listing when the directory holds
    /// more than `limit` entries. Takes `&mut self` so implementations can
    /// populate caches lazily.
    fn children(&mut self, path: &Path, limit: usize) -> Option<Vec<PathBuf>>;
}

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FsEntry {
    /// The text of the "Type" column.
    pub fn kind(&self) -> String {
        if self.is_directory {
            return "Folder".to_string();
        }
        match Path::new(&self.name).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{ext} File"),
            _ => "File".to_string(),
        }
    }
}

/// Lists directories on demand and applies the name filter and sort order.
pub struct FileSystemModel {
    show_hidden: bool,
    name_filter: Option<NameFilter>,
    sort: SortSpec,
    cache: HashMap<PathBuf, Vec<FsEntry>>,
}

impl FileSystemModel {
    pub fn new(show_hidden: bool, sort: SortSpec) -> Self {
        Self {
            show_hidden,
            name_filter: None,
            sort,
            cache: HashMap::new(),
        }
    }

    /// Installs or removes the pattern filter. Only files are filtered; directories always stay visible.
    pub fn set_name_filter(&mut self, filter: Option<NameFilter>) {
        self.name_filter = filter;
    }

    pub fn name_filter(&self) -> Option<&NameFilter> {
        self.name_filter.as_ref()
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Forgets every cached listing so the next access re-reads the disk.
    pub fn invalidate(&mut self) {
        tracing::debug!("Dropping {} cached directory listings.", self.cache.len());
        self.cache.clear();
    }

    /// A path is valid while it still exists on disk.
    pub fn is_valid(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    /// Returns `true` if the path would be listed by its parent under the current filter.
    pub fn passes_filter(&self, path: &Path) -> bool {
        match &self.name_filter {
            None => true,
            Some(_) if path.is_dir() => true,
            Some(filter) => path
                .file_name()
                .map(|name| filter.is_match(&name.to_string_lossy()))
                .unwrap_or(false),
        }
    }

    /// The filtered and sorted entries of a directory.
    ///
    /// A directory that cannot be read (removed, permission denied) has no entries.
    pub fn entries(&mut self, dir: &Path) -> Vec<FsEntry> {
        // Without a limit the read never reports an oversized directory.
        let _ = self.load(dir, usize::MAX);
        self.visible_entries(dir)
    }

    /// Reads `dir` into the cache unless it is there already.
    ///
    /// A directory with more than `limit` entries is left uncached and
    /// reported as `TooManyEntries`; other read errors cache an empty listing.
    fn load(&mut self, dir: &Path, limit: usize) -> Result<(), CoreError> {
        if let Some(listing) = self.cache.get(dir) {
            if listing.len() > limit {
                return Err(CoreError::TooManyEntries(dir.to_path_buf(), limit));
            }
            return Ok(());
        }

        let listing = match read_directory_level(dir, self.show_hidden, limit) {
            Ok(listing) => listing,
            Err(e @ CoreError::TooManyEntries(..)) => return Err(e),
            Err(e) => {
                tracing::debug!("Treating {:?} as empty: {}", dir, e);
                Vec::new()
            }
        };
        self.cache.insert(dir.to_path_buf(), listing);
        Ok(())
    }

    fn visible_entries(&self, dir: &Path) -> Vec<FsEntry> {
        let mut visible: Vec<FsEntry> = self
            .cache
            .get(dir)
            .map(|listing| {
                listing
                    .iter()
                    .filter(|entry| self.entry_passes_filter(entry))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        sort_entries(&mut visible, self.sort);
        visible
    }

    fn entry_passes_filter(&self, entry: &FsEntry) -> bool {
        match &self.name_filter {
            Some(filter) if !entry.is_directory => filter.is_match(&entry.name),
            _ => true,
        }
    }
}

impl TreeModel for FileSystemModel {
    fn file_name(&self, path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn children(&mut self, path: &Path, limit: usize) -> Option<Vec<PathBuf>> {
        if let Err(e) = self.load(path, limit) {
            tracing::debug!("Not descending: {}", e);
            return None;
        }
        Some(
            self.visible_entries(path)
                .into_iter()
                .map(|entry| entry.path)
                .collect(),
        )
    }
}

/// Reads the immediate children of `dir`, unfiltered and unsorted.
///
/// Stops after `limit + 1` entries and reports the directory as too large,
/// so the caller never pays for stat calls beyond its budget.
fn read_directory_level(
    dir: &Path,
    show_hidden: bool,
    limit: usize,
) -> Result<Vec<FsEntry>, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut first_error = None;
    for result in WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(!show_hidden)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {:?}: {}", dir, e);
                first_error.get_or_insert(e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if entries.len() == limit {
            return Err(CoreError::TooManyEntries(dir.to_path_buf(), limit));
        }

        let path = entry.path().to_path_buf();
        // `is_dir` follows symlinks so linked folders can be expanded.
        let is_directory = path.is_dir();
        let metadata = std::fs::metadata(&path)
            .or_else(|_| path.symlink_metadata())
            .map_err(|e| CoreError::Io(e, path.clone()));
        let (size, modified) = match metadata {
            Ok(meta) => (
                if is_directory { 0 } else { meta.len() },
                meta.modified().ok(),
            ),
            Err(e) => {
                tracing::debug!("{}", e);
                (0, None)
            }
        };

        entries.push(FsEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path,
            is_directory,
            size,
            modified,
        });
    }

    // Nothing listed plus an error means the level itself was unreadable.
    match first_error {
        Some(e) if entries.is_empty() => Err(CoreError::Walk(e, dir.to_path_buf())),
        _ => Ok(entries),
    }
}

/// Sorts ascending with directories first, then reverses for descending order.
pub fn sort_entries(entries: &mut [FsEntry], sort: SortSpec) {
    entries.sort_by(|a, b| {
        let by_type = b.is_directory.cmp(&a.is_directory);
        if by_type != Ordering::Equal {
            return by_type;
        }
        let by_column = match sort.column {
            SortColumn::Name => Ordering::Equal,
            SortColumn::Size => a.size.cmp(&b.size),
            SortColumn::Kind => a.kind().to_lowercase().cmp(&b.kind().to_lowercase()),
            SortColumn::Modified => a.modified.cmp(&b.modified),
        };
        by_column.then_with(|| compare_names(&a.name, &b.name))
    });
    if sort.order == SortOrder::Descending {
        entries.reverse();
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
