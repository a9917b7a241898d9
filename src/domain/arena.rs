use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::organization::OrganizationNode;
use crate::domain::status::OrganizationStatus;

/// Shape of an organization tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    /// Unlimited children per node, attached directly below the sponsor.
    #[default]
    Unilevel,
    /// At most a left and a right child; overflow spills down breadth-first.
    Binary,
}

impl TreeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeType::Unilevel => "unilevel",
            TreeType::Binary => "binary",
        }
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leg of a binary tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryPosition {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl fmt::Display for BinaryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryPosition::Left => f.write_str("L"),
            BinaryPosition::Right => f.write_str("R"),
        }
    }
}

/// Data payload for one member of the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberData {
    pub node_id: String,
    pub name: String,
    pub rank: String,
    pub pv_left: u64,
    pub pv_right: u64,
    pub status: OrganizationStatus,
}

impl fmt::Display for MemberData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.node_id)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: MemberData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, left to right
    pub children: Vec<Index>,
    /// Leg below the parent, only set in binary trees
    pub position: Option<BinaryPosition>,
    pub depth: usize,
}

/// Where a newly placed member ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub index: Index,
    pub parent_id: String,
    pub position: Option<BinaryPosition>,
    pub depth: usize,
    /// True when the member was placed below someone other than the sponsor.
    pub spillover: bool,
}

/// Arena-based organization tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
#[derive(Debug)]
pub struct OrgArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for OrgArena {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(
        &mut self,
        data: MemberData,
        parent: Option<Index>,
        position: Option<BinaryPosition>,
    ) -> Index {
        let depth = parent
            .and_then(|idx| self.arena.get(idx))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
            position,
            depth,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Look up a node by its member id.
    pub fn find(&self, node_id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.node_id == node_id)
            .map(|(idx, _)| idx)
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels; an empty arena has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, node)| node.depth + 1).max().unwrap_or(0)
    }

    /// Member ids of all nodes without children, in pre-order.
    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.node_id.clone())
            .collect()
    }

    /// Rebuild the nested tree consumed by the flattener.
    ///
    /// Children are assembled bottom-up from a post-order walk, so deep
    /// hierarchies do not recurse.
    #[instrument(level = "debug", skip(self))]
    pub fn to_organization_node(&self) -> Option<OrganizationNode> {
        let root = self.root?;
        let mut built: Vec<(Index, OrganizationNode)> = Vec::new();

        for (idx, node) in self.iter_postorder() {
            // children of `node` are the last `children.len()` finished entries
            let split = built.len() - node.children.len();
            let children = built.split_off(split).into_iter().map(|(_, n)| n).collect();
            let data = &node.data;
            let org = OrganizationNode {
                id: data.node_id.clone(),
                name: data.name.clone(),
                rank: data.rank.clone(),
                pv_left: data.pv_left,
                pv_right: data.pv_right,
                status: data.status,
                children,
            };
            built.push((idx, org));
        }

        built
            .pop()
            .filter(|(idx, _)| *idx == root)
            .map(|(_, node)| node)
    }

    /// Attach a new member below `sponsor_id`.
    ///
    /// Unilevel trees append to the sponsor directly. Binary trees search
    /// breadth-first from the sponsor for the first free left, then right, leg.
    #[instrument(level = "debug", skip(self, data), fields(node_id = %data.node_id))]
    pub fn place_member(
        &mut self,
        sponsor_id: &str,
        data: MemberData,
        tree_type: TreeType,
    ) -> DomainResult<Placement> {
        if self.find(&data.node_id).is_some() {
            return Err(DomainError::DuplicateNode(data.node_id));
        }
        let sponsor = self
            .find(sponsor_id)
            .ok_or_else(|| DomainError::NodeNotFound(sponsor_id.to_string()))?;

        let (parent, position) = match tree_type {
            TreeType::Unilevel => (sponsor, None),
            TreeType::Binary => {
                let (parent, position) = self
                    .locate_binary_slot(sponsor)
                    .ok_or_else(|| DomainError::NoBinarySlot(sponsor_id.to_string()))?;
                (parent, Some(position))
            }
        };

        let index = self.insert_node(data, Some(parent), position);
        let parent_node = self
            .get_node(parent)
            .ok_or_else(|| DomainError::NodeNotFound(sponsor_id.to_string()))?;
        let placement = Placement {
            index,
            parent_id: parent_node.data.node_id.clone(),
            position,
            depth: parent_node.depth + 1,
            spillover: parent != sponsor,
        };
        debug!(
            "placed below {} at depth {} (spillover: {})",
            placement.parent_id, placement.depth, placement.spillover
        );
        Ok(placement)
    }

    /// First node below `start` (inclusive) with a free binary leg.
    pub fn locate_binary_slot(&self, start: Index) -> Option<(Index, BinaryPosition)> {
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(candidate) = queue.pop_front() {
            let node = self.get_node(candidate)?;
            let leg = |pos: BinaryPosition| {
                node.children
                    .iter()
                    .copied()
                    .find(|&c| self.get_node(c).and_then(|n| n.position) == Some(pos))
            };
            let Some(left) = leg(BinaryPosition::Left) else {
                return Some((candidate, BinaryPosition::Left));
            };
            let Some(right) = leg(BinaryPosition::Right) else {
                return Some((candidate, BinaryPosition::Right));
            };
            queue.push_back(left);
            queue.push_back(right);
        }
        None
    }
}

pub struct TreeIterator<'a> {
    arena: &'a OrgArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a OrgArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a OrgArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a OrgArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
