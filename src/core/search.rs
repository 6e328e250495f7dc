//! The incremental name search that expands matching nodes.

use super::fs_model::TreeModel;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Upper bound on the nodes a single search may visit, root included.
pub const SEARCH_NODE_LIMIT: usize = 4000;

/// What a search walk decided to expand.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Directories to expand: matching directories and every ancestor of a match below the root.
    pub expanded: HashSet<PathBuf>,
    /// Every visited node whose name contains the needle.
    pub matches: Vec<PathBuf>,
    /// Number of nodes taken off the stack.
    pub visited: usize,
    /// `true` if the node limit stopped the walk before the tree was exhausted.
    pub truncated: bool,
}

/// Normalizes raw search box text into the needle used for matching.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns `true` if `name` contains the (already lowercased) needle, ignoring case.
pub fn name_matches(name: &str, needle: &str) -> bool {
    !needle.is_empty() && name.to_lowercase().contains(needle)
}

/// Walks the tree under `root` depth-first and collects the nodes to expand.
///
/// At most `max_nodes` nodes are visited, and directories are listed only
/// while their entries fit into what is left of that budget: a node is
/// pushed only if it will be visited. The first directory too large for the
/// remaining budget ends all further listing. Only directories are descended
/// into. Children are pushed in reverse so they are visited in display order.
pub fn expand_matching_under<M: TreeModel + ?Sized>(
    model: &mut M,
    root: &Path,
    needle: &str,
    max_nodes: usize,
) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();
    if needle.is_empty() {
        return outcome;
    }

    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut listing_exhausted = false;
    while outcome.visited < max_nodes {
        let Some(node) = stack.pop() else {
            break;
        };
        outcome.visited += 1;

        let is_dir = model.is_dir(&node);
        if name_matches(&model.file_name(&node), needle) {
            if is_dir && node != root {
                outcome.expanded.insert(node.clone());
            }
            let mut current = node.parent();
            while let Some(parent) = current {
                if parent == root || !parent.starts_with(root) {
                    break;
                }
                // Ancestors already inserted imply the rest of the chain is too.
                if !outcome.expanded.insert(parent.to_path_buf()) {
                    break;
                }
                current = parent.parent();
            }
            outcome.matches.push(node.clone());
        }

        if is_dir && !listing_exhausted {
            let budget = max_nodes.saturating_sub(outcome.visited + stack.len());
            match model.children(&node, budget) {
                Some(children) => stack.extend(children.into_iter().rev()),
                None => {
                    listing_exhausted = true;
                    outcome.truncated = true;
                }
            }
        }
    }
    outcome.truncated |= !stack.is_empty();

    tracing::debug!(
        "Search for '{}' visited {} nodes, {} matches, truncated: {}",
        needle,
        outcome.visited,
        outcome.matches.len(),
        outcome.truncated
    );
    outcome
}
