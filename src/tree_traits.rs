//! Conversion of organization hierarchies into printable `termtree` trees.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{OrgArena, OrganizationNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn node_label(name: &str, id: &str, rank: &str, status: &str) -> String {
    if rank.is_empty() {
        format!("{} ({}) [{}]", name, id, status)
    } else {
        format!("{} ({}) {} [{}]", name, id, rank, status)
    }
}

/// Assemble a tree from `(label, child_count)` pairs in post-order.
///
/// A node's children are the last `child_count` finished subtrees.
fn assemble(postorder: impl Iterator<Item = (String, usize)>) -> Option<Tree<String>> {
    let mut built: Vec<Tree<String>> = Vec::new();
    for (label, child_count) in postorder {
        let leaves = built.split_off(built.len().saturating_sub(child_count));
        built.push(Tree::new(label).with_leaves(leaves));
    }
    built.pop()
}

impl TreeNodeConvert for OrganizationNode {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut postorder = Vec::new();
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                postorder.push(node);
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().rev().map(|c| (c, false)));
            }
        }

        let labelled = postorder.into_iter().map(|n| {
            (
                node_label(&n.name, &n.id, &n.rank, n.status.as_str()),
                n.children.len(),
            )
        });
        assemble(labelled).unwrap_or_else(|| Tree::new(String::new()))
    }
}

impl TreeNodeConvert for OrgArena {
    fn to_tree_string(&self) -> Tree<String> {
        let labelled = self.iter_postorder().map(|(_, n)| {
            let mut label =
                node_label(&n.data.name, &n.data.node_id, &n.data.rank, n.data.status.as_str());
            if let Some(position) = n.position {
                label = format!("{}: {}", position, label);
            }
            (label, n.children.len())
        });
        assemble(labelled).unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganizationStatus;

    #[test]
    fn given_nested_node_when_rendering_then_children_indented_below_root() {
        let root = OrganizationNode::new("r", "Root", "Gold", OrganizationStatus::Active)
            .with_children(vec![OrganizationNode::new(
                "c",
                "Child",
                "",
                OrganizationStatus::Hold,
            )]);

        let rendered = root.to_tree_string().to_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Root (r) Gold [active]");
        assert!(lines[1].ends_with("Child (c) [hold]"));
    }

    #[test]
    fn given_siblings_with_subtrees_when_rendering_then_keeps_sibling_order() {
        let node = |id: &str| OrganizationNode::new(id, id, "", OrganizationStatus::Active);
        let root = node("r").with_children(vec![
            node("a").with_children(vec![node("a1"), node("a2")]),
            node("b"),
        ]);

        let tree = root.to_tree_string();

        let children: Vec<&str> = tree.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(children, vec!["a (a) [active]", "b (b) [active]"]);
        let grandchildren: Vec<&str> =
            tree.leaves[0].leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(grandchildren, vec!["a1 (a1) [active]", "a2 (a2) [active]"]);
    }

    #[test]
    fn given_arena_when_rendering_then_legs_prefix_labels() {
        use crate::domain::{BinaryPosition, MemberData};

        let member = |id: &str| MemberData {
            node_id: id.to_string(),
            name: id.to_string(),
            rank: String::new(),
            pv_left: 0,
            pv_right: 0,
            status: OrganizationStatus::Active,
        };
        let mut arena = OrgArena::new();
        let root = arena.insert_node(member("r"), None, None);
        arena.insert_node(member("x"), Some(root), Some(BinaryPosition::Left));
        arena.insert_node(member("y"), Some(root), Some(BinaryPosition::Right));

        let tree = arena.to_tree_string();

        assert_eq!(tree.root, "r (r) [active]");
        let children: Vec<&str> = tree.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(children, vec!["L: x (x) [active]", "R: y (y) [active]"]);
    }
}
