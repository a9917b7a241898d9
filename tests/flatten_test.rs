//! Tests for breadth-first level flattening

use std::collections::HashSet;

use rstest::rstest;

use orgtree::domain::{flatten, DomainError, LevelNode, Levels, OrganizationNode, OrganizationStatus};

fn node(id: &str) -> OrganizationNode {
    OrganizationNode::new(id, format!("Member {}", id), "Silver", OrganizationStatus::Active)
}

fn ids(levels: &Levels) -> Vec<Vec<String>> {
    levels
        .iter()
        .map(|row| row.iter().map(|n| n.id.clone()).collect())
        .collect()
}

/// root -> [a -> [a1, a2], b, c -> [c1 -> [c1x]]]
fn wide_tree() -> OrganizationNode {
    node("root").with_children(vec![
        node("a").with_children(vec![node("a1"), node("a2")]),
        node("b"),
        node("c").with_children(vec![node("c1").with_children(vec![node("c1x")])]),
    ])
}

/// Edges from `root` to every node, found by walking parent links.
fn expected_depths(root: &OrganizationNode) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((n, d)) = stack.pop() {
        out.push((n.id.clone(), d));
        for c in &n.children {
            stack.push((c, d + 1));
        }
    }
    out
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_single_root_when_flattening_then_single_group() {
    let levels = flatten(Some(&node("root"))).unwrap();

    assert_eq!(ids(&levels), vec![vec!["root"]]);
    assert_eq!(levels.get(0).unwrap()[0].depth, 0);
}

#[test]
fn given_two_childless_children_when_flattening_then_second_group_in_child_order() {
    let root = node("root").with_children(vec![node("child1"), node("child2")]);

    let levels = flatten(Some(&root)).unwrap();

    assert_eq!(ids(&levels), vec![vec!["root"], vec!["child1", "child2"]]);
}

#[test]
fn given_grandchild_under_first_child_when_flattening_then_alone_at_depth_two() {
    let root = node("root").with_children(vec![
        node("A").with_children(vec![node("grandchild")]),
        node("B"),
    ]);

    let levels = flatten(Some(&root)).unwrap();

    assert_eq!(
        ids(&levels),
        vec![vec!["root"], vec!["A", "B"], vec!["grandchild"]]
    );
    assert_eq!(levels.get(2).unwrap()[0].depth, 2);
}

#[test]
fn given_reverse_alphabetical_children_when_flattening_then_supplied_order_kept() {
    let root = node("root").with_children(vec![
        node("B"),
        node("A").with_children(vec![node("C")]),
    ]);

    let levels = flatten(Some(&root)).unwrap();

    assert_eq!(ids(&levels), vec![vec!["root"], vec!["B", "A"], vec!["C"]]);
}

#[test]
fn given_absent_root_when_flattening_then_invalid_input() {
    let result = flatten(None);

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

// ============================================================
// Properties
// ============================================================

#[test]
fn given_tree_when_flattening_then_every_depth_counts_edges_from_root() {
    let root = wide_tree();
    let levels = flatten(Some(&root)).unwrap();

    let flat: Vec<&LevelNode> = levels.iter().flatten().collect();
    for (id, depth) in expected_depths(&root) {
        let found = flat.iter().find(|n| n.id == id).unwrap();
        assert_eq!(found.depth, depth, "depth of {}", id);
    }
    for (index, row) in levels.iter().enumerate() {
        assert!(row.iter().all(|n| n.depth == index));
    }
}

#[test]
fn given_tree_when_flattening_then_each_node_appears_exactly_once() {
    let root = wide_tree();
    let levels = flatten(Some(&root)).unwrap();

    assert_eq!(levels.node_count(), root.node_count());
    let unique: HashSet<&str> = levels.iter().flatten().map(|n| n.id.as_str()).collect();
    assert_eq!(unique.len(), root.node_count());
}

#[test]
fn given_cousins_when_flattening_then_grouped_by_parent_order() {
    let levels = flatten(Some(&wide_tree())).unwrap();

    assert_eq!(
        ids(&levels),
        vec![
            vec!["root"],
            vec!["a", "b", "c"],
            vec!["a1", "a2", "c1"],
            vec!["c1x"],
        ]
    );
}

#[rstest]
#[case(node("solo"))]
#[case(wide_tree())]
#[case(node("r").with_children(vec![node("x"), node("y"), node("z")]))]
fn given_any_tree_when_flattening_then_root_isolated_in_first_group(
    #[case] root: OrganizationNode,
) {
    let levels = flatten(Some(&root)).unwrap();

    let first = levels.get(0).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].depth, 0);
    assert_eq!(first[0].id, root.id);
}

#[test]
fn given_same_tree_when_flattening_twice_then_identical_output() {
    let root = wide_tree();
    let before = root.clone();

    let first = flatten(Some(&root)).unwrap();
    let second = flatten(Some(&root)).unwrap();

    assert_eq!(first, second);
    assert_eq!(root, before, "input must not be mutated");
}

#[test]
fn given_missing_children_field_when_parsing_then_treated_as_leaf() {
    let root: OrganizationNode = serde_json::from_str(
        r#"{"id":"r","name":"R","rank":"Gold","pvLeft":1,"pvRight":2,"status":"active"}"#,
    )
    .unwrap();

    let levels = flatten(Some(&root)).unwrap();

    assert!(root.is_leaf());
    assert_eq!(levels.len(), 1);
    assert_eq!(levels.get(0).unwrap()[0].child_count, 0);
}

#[test]
fn given_deep_chain_when_flattening_then_no_stack_overflow() {
    let mut current = node("leaf");
    for i in (0..20_000).rev() {
        current = node(&format!("n{}", i)).with_children(vec![current]);
    }

    let levels = flatten(Some(&current)).unwrap();

    assert_eq!(levels.len(), 20_001);
    assert_eq!(levels.max_width(), 1);
}
