pub mod error;
pub mod fs_model;
pub mod patterns;
pub mod search;

use serde::{Deserialize, Serialize};

/// The column the tree is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Name,
    Size,
    Kind,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

pub use error::CoreError;
pub use fs_model::{FileSystemModel, FsEntry, TreeModel};
pub use patterns::{parse_pattern_list, NameFilter};
pub use search::{expand_matching_under, SearchOutcome, SEARCH_NODE_LIMIT};
