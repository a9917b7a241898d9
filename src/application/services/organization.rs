//! Organization hierarchy service
//!
//! Loads organization trees from JSON and prepares them for row rendering.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    flatten, Levels, MemberData, OrgArena, OrgTreeBuilder, OrganizationNode, OrganizationRecord,
    Placement, TreeType,
};
use crate::infrastructure::traits::FileSystem;

/// Per-depth totals for one row of the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub depth: usize,
    /// Grid column count for the row.
    pub width: usize,
    pub pv_left: u64,
    pub pv_right: u64,
}

/// Service for loading and flattening organization trees.
pub struct OrganizationService {
    fs: Arc<dyn FileSystem>,
}

impl OrganizationService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the root node from `path`.
    ///
    /// Accepts a nested node document, `null`, or an array of flat records
    /// which is assembled through [`OrgTreeBuilder`]. Nested documents have
    /// no depth limit.
    #[instrument(level = "debug", skip(self))]
    pub fn load_root(&self, path: &Path) -> ApplicationResult<Option<OrganizationNode>> {
        let content = self.read(path)?;
        let trimmed = content.trim();
        if trimmed == "null" {
            return Ok(None);
        }
        if trimmed.starts_with('[') {
            let arena = self.arena_from_str(trimmed, path)?;
            return Ok(arena.to_organization_node());
        }

        let node = parse_nested(trimmed).with_path_context("parse organization tree", path)?;
        debug!("loaded nested tree with {} nodes", node.node_count());
        Ok(Some(node))
    }

    /// Load the flat record form into an arena.
    #[instrument(level = "debug", skip(self))]
    pub fn load_arena(&self, path: &Path) -> ApplicationResult<OrgArena> {
        let content = self.read(path)?;
        self.arena_from_str(&content, path)
    }

    /// Load `path` and flatten it into depth-indexed rows.
    #[instrument(level = "debug", skip(self))]
    pub fn levels(&self, path: &Path) -> ApplicationResult<Levels> {
        let root = self.load_root(path)?;
        let levels = flatten(root.as_ref())?;
        debug!(
            "flattened {} nodes into {} levels",
            levels.node_count(),
            levels.len()
        );
        Ok(levels)
    }

    pub fn summary(&self, levels: &Levels) -> Vec<LevelSummary> {
        levels
            .iter()
            .enumerate()
            .map(|(depth, row)| LevelSummary {
                depth,
                width: row.len(),
                pv_left: row.iter().map(|n| n.pv_left).sum(),
                pv_right: row.iter().map(|n| n.pv_right).sum(),
            })
            .collect()
    }

    /// Place a new member in the record tree at `path`.
    ///
    /// The file is not rewritten; the updated arena is returned with the placement.
    #[instrument(level = "debug", skip(self, member))]
    pub fn place(
        &self,
        path: &Path,
        sponsor_id: &str,
        member: MemberData,
        tree_type: TreeType,
    ) -> ApplicationResult<(OrgArena, Placement)> {
        let mut arena = self.load_arena(path)?;
        let placement = arena.place_member(sponsor_id, member, tree_type)?;
        Ok((arena, placement))
    }

    fn read(&self, path: &Path) -> ApplicationResult<String> {
        self.fs
            .read_to_string(path)
            .with_path_context("read organization file", path)
    }

    fn arena_from_str(&self, content: &str, path: &Path) -> ApplicationResult<OrgArena> {
        let records: Vec<OrganizationRecord> =
            serde_json::from_str(content).with_path_context("parse organization records", path)?;
        Ok(OrgTreeBuilder::new().build(&records)?)
    }
}

/// Deserialize a nested node document, growing the stack on demand.
fn parse_nested(content: &str) -> Result<OrganizationNode, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let node = OrganizationNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(node)
}
