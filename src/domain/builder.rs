//! Tree builder for assembling an organization from flat parent-linked records.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{BinaryPosition, MemberData, OrgArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::status::OrganizationStatus;

/// Stored form of an organization member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub pv_left: u64,
    #[serde(default)]
    pub pv_right: u64,
    pub status: OrganizationStatus,
    #[serde(default)]
    pub parent_node_id: Option<String>,
    #[serde(default)]
    pub position: Option<BinaryPosition>,
}

impl OrganizationRecord {
    fn member(&self) -> MemberData {
        MemberData {
            node_id: self.node_id.clone(),
            name: self.name.clone(),
            rank: self.rank.clone(),
            pv_left: self.pv_left,
            pv_right: self.pv_right,
            status: self.status,
        }
    }
}

/// Constructs an [`OrgArena`] from records, rejecting anything that is not a
/// single rooted, acyclic tree.
#[derive(Debug, Default)]
pub struct OrgTreeBuilder {
    children_of: HashMap<String, Vec<usize>>,
}

impl OrgTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&mut self, records: &[OrganizationRecord]) -> DomainResult<OrgArena> {
        if records.is_empty() {
            return Err(DomainError::EmptyOrganization);
        }
        self.children_of.clear();

        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(record.node_id.as_str()) {
                return Err(DomainError::DuplicateNode(record.node_id.clone()));
            }
        }

        let mut root: Option<usize> = None;
        for (i, record) in records.iter().enumerate() {
            match &record.parent_node_id {
                None => {
                    if let Some(existing) = root {
                        return Err(DomainError::MultipleRoots(
                            records[existing].node_id.clone(),
                            record.node_id.clone(),
                        ));
                    }
                    root = Some(i);
                }
                Some(parent) if !seen.contains(parent.as_str()) => {
                    return Err(DomainError::UnknownParent {
                        node_id: record.node_id.clone(),
                        parent_id: parent.clone(),
                    });
                }
                Some(parent) => self.children_of.entry(parent.clone()).or_default().push(i),
            }
        }

        // every record has a parent, so the parent links must loop
        let root = root.ok_or_else(|| DomainError::CycleDetected(records[0].node_id.clone()))?;

        let arena = self.build_tree(records, root);
        if arena.len() != records.len() {
            let attached: HashSet<String> =
                arena.iter().map(|(_, n)| n.data.node_id.clone()).collect();
            let detached = records
                .iter()
                .find(|r| !attached.contains(&r.node_id))
                .map(|r| r.node_id.clone())
                .unwrap_or_default();
            return Err(DomainError::CycleDetected(detached));
        }
        debug!("built tree with {} nodes, depth {}", arena.len(), arena.depth());
        Ok(arena)
    }

    fn build_tree(&self, records: &[OrganizationRecord], root: usize) -> OrgArena {
        let mut tree = OrgArena::new();
        let mut stack = vec![(root, None)];

        while let Some((current, parent_idx)) = stack.pop() {
            let record = &records[current];
            let current_idx = tree.insert_node(record.member(), parent_idx, record.position);

            if let Some(children) = self.children_of.get(&record.node_id) {
                let mut ordered = children.clone();
                // binary legs are always laid out left then right
                ordered.sort_by_key(|&c| match records[c].position {
                    Some(BinaryPosition::Left) => 0,
                    Some(BinaryPosition::Right) => 1,
                    None => 0,
                });
                // reversed so the stack pops them in record order
                for &child in ordered.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        tree
    }
}
