//! Organization hierarchy and breadth-first level flattening.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::status::OrganizationStatus;

/// Member of the organization hierarchy as supplied by the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    pub id: String,
    pub name: String,
    pub rank: String,
    pub pv_left: u64,
    pub pv_right: u64,
    pub status: OrganizationStatus,
    /// Ordered left to right; absent is the same as empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OrganizationNode>,
}

impl OrganizationNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rank: impl Into<String>,
        status: OrganizationStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank: rank.into(),
            pv_left: 0,
            pv_right: 0,
            status,
            children: Vec::new(),
        }
    }

    pub fn with_pv(mut self, pv_left: u64, pv_right: u64) -> Self {
        self.pv_left = pv_left;
        self.pv_right = pv_right;
        self
    }

    pub fn with_children(mut self, children: Vec<OrganizationNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Flatten this subtree into depth-indexed rows.
    pub fn levels(&self) -> Levels {
        flatten_from(self)
    }
}

impl Drop for OrganizationNode {
    // Unlinks descendants onto a heap stack so deep chains drop without recursion.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Flat copy of an [`OrganizationNode`] annotated with its depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelNode {
    pub id: String,
    pub name: String,
    pub rank: String,
    pub pv_left: u64,
    pub pv_right: u64,
    pub status: OrganizationStatus,
    pub depth: usize,
    pub child_count: usize,
}

impl LevelNode {
    fn from_node(node: &OrganizationNode, depth: usize) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            rank: node.rank.clone(),
            pv_left: node.pv_left,
            pv_right: node.pv_right,
            status: node.status,
            depth,
            child_count: node.children.len(),
        }
    }

    /// Accessible description of the member card.
    pub fn aria_label(&self) -> String {
        format!(
            "{}, 직급 {}, 좌측 PV {}, 우측 PV {}",
            self.name, self.rank, self.pv_left, self.pv_right
        )
    }
}

/// Rows of [`LevelNode`]s indexed by depth, each in breadth-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Levels(Vec<Vec<LevelNode>>);

impl Levels {
    /// Number of depth groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&[LevelNode]> {
        self.0.get(depth).map(Vec::as_slice)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<LevelNode>> {
        self.0.iter()
    }

    /// Total nodes across all groups.
    pub fn node_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// Widest row, used to size the canvas grid.
    pub fn max_width(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn into_inner(self) -> Vec<Vec<LevelNode>> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Levels {
    type Item = &'a Vec<LevelNode>;
    type IntoIter = std::slice::Iter<'a, Vec<LevelNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Flatten an organization tree into depth-indexed rows.
///
/// Group `d` holds every node `d` edges below the root, ordered first by the
/// position of its parent in group `d - 1` and then by sibling order.
///
/// # Errors
/// Returns [`DomainError::InvalidInput`] when `root` is absent, so callers can
/// tell "no data" apart from an empty result.
#[instrument(level = "debug", skip(root))]
pub fn flatten(root: Option<&OrganizationNode>) -> DomainResult<Levels> {
    let root = root.ok_or_else(|| DomainError::InvalidInput("root node is absent".into()))?;
    Ok(flatten_from(root))
}

fn flatten_from(root: &OrganizationNode) -> Levels {
    let mut levels: Vec<Vec<LevelNode>> = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back((root, 0usize));

    while let Some((node, depth)) = queue.pop_front() {
        // BFS reaches depth d only after every node at d - 1 has been pushed
        if levels.len() == depth {
            levels.push(Vec::new());
        }
        levels[depth].push(LevelNode::from_node(node, depth));
        for child in &node.children {
            queue.push_back((child, depth + 1));
        }
    }

    Levels(levels)
}
