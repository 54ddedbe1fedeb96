//! Rebuilds folder paths from the flat `moz_bookmarks` parent pointers.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::places::BookmarkRow;

/// Ids 0 and 1 are the places root; traversal stops there.
pub const ROOT_SENTINEL: i64 = 1;

/// How a bookmark's path is turned into display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleStyle {
    /// Only the bookmark's own title.
    FinalSegment,
    /// Every titled segment from the root, joined with `separator`.
    FullPath { separator: String },
}

impl TitleStyle {
    pub fn render(&self, path: &AncestorPath) -> String {
        match self {
            TitleStyle::FinalSegment => path.final_segment().unwrap_or_default().to_string(),
            TitleStyle::FullPath { separator } => path.full_path(separator),
        }
    }
}

/// id -> (title, parent id) for every node of the tree.
#[derive(Debug, Default)]
pub struct ParentIndex {
    nodes: HashMap<i64, (Option<String>, i64)>,
}

impl ParentIndex {
    pub fn from_rows(rows: &[BookmarkRow]) -> Self {
        let nodes = rows
            .iter()
            .map(|row| (row.id, (row.title.clone(), row.parent_id)))
            .collect();
        Self { nodes }
    }

    /// Titles from the root down to `id` itself (root excluded).
    ///
    /// A chain longer than the number of indexed nodes can only be a cycle, and
    /// an id missing from the index is a dangling parent; both are reported as
    /// [`Error::MalformedTree`].
    pub fn ancestor_path(&self, id: i64) -> Result<AncestorPath> {
        let mut segments = Vec::new();
        let mut current = id;

        while current > ROOT_SENTINEL {
            if segments.len() >= self.nodes.len() {
                return Err(Error::MalformedTree { id });
            }
            let (title, parent) = self
                .nodes
                .get(&current)
                .ok_or(Error::MalformedTree { id })?;
            segments.push(title.clone());
            current = *parent;
        }

        segments.reverse();
        Ok(AncestorPath { segments })
    }
}

/// Root-to-leaf titles of one bookmark, its own title last. Untitled nodes
/// keep their slot as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AncestorPath {
    segments: Vec<Option<String>>,
}

impl AncestorPath {
    pub fn new(segments: Vec<Option<String>>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn titles(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| s.as_deref())
    }

    pub fn full_path(&self, separator: &str) -> String {
        self.titles().collect::<Vec<_>>().join(separator)
    }

    pub fn final_segment(&self) -> Option<&str> {
        self.titles().last()
    }

    /// Whether the bookmark lives in the folder named by `filter` or below it.
    ///
    /// Only the folder segments are compared, never the bookmark's own title.
    /// Exact and case-sensitive; a filter deeper than the bookmark's folder
    /// never matches.
    pub fn matches(&self, filter: &[String]) -> bool {
        let folders = &self.segments[..self.segments.len().saturating_sub(1)];
        filter.len() <= folders.len()
            && filter
                .iter()
                .zip(folders)
                .all(|(want, have)| have.as_deref() == Some(want.as_str()))
    }

    /// The path without its first `n` segments.
    pub fn strip_prefix(&self, n: usize) -> AncestorPath {
        AncestorPath {
            segments: self.segments.iter().skip(n).cloned().collect(),
        }
    }
}
