//! Tests for OrgTreeBuilder and member placement

use orgtree::domain::{
    BinaryPosition, DomainError, MemberData, OrgTreeBuilder, OrganizationRecord,
    OrganizationStatus, TreeType,
};

fn record(id: &str, parent: Option<&str>) -> OrganizationRecord {
    OrganizationRecord {
        node_id: id.into(),
        name: id.to_uppercase(),
        rank: "Bronze".into(),
        pv_left: 0,
        pv_right: 0,
        status: OrganizationStatus::Active,
        parent_node_id: parent.map(str::to_string),
        position: None,
    }
}

fn binary(id: &str, parent: &str, position: BinaryPosition) -> OrganizationRecord {
    OrganizationRecord {
        position: Some(position),
        ..record(id, Some(parent))
    }
}

fn member(id: &str) -> MemberData {
    MemberData {
        node_id: id.into(),
        name: id.to_uppercase(),
        rank: String::new(),
        pv_left: 0,
        pv_right: 0,
        status: OrganizationStatus::Active,
    }
}

// ============================================================
// Building
// ============================================================

#[test]
fn given_records_when_building_then_child_order_follows_input() {
    let records = vec![
        record("root", None),
        record("b", Some("root")),
        record("a", Some("root")),
        record("c", Some("a")),
    ];

    let arena = OrgTreeBuilder::new().build(&records).unwrap();
    let root = arena.to_organization_node().unwrap();

    let order: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["b", "a"]);
    assert_eq!(arena.len(), 4);
    assert_eq!(arena.depth(), 3);
}

#[test]
fn given_right_leg_listed_first_when_building_then_left_leg_comes_first() {
    let records = vec![
        record("root", None),
        binary("r", "root", BinaryPosition::Right),
        binary("l", "root", BinaryPosition::Left),
    ];

    let arena = OrgTreeBuilder::new().build(&records).unwrap();
    let root = arena.to_organization_node().unwrap();

    let order: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["l", "r"]);
}

#[test]
fn given_no_records_when_building_then_empty_organization() {
    let err = OrgTreeBuilder::new().build(&[]).unwrap_err();
    assert_eq!(err, DomainError::EmptyOrganization);
}

#[test]
fn given_two_roots_when_building_then_multiple_roots() {
    let records = vec![record("a", None), record("b", None)];

    let err = OrgTreeBuilder::new().build(&records).unwrap_err();

    assert_eq!(err, DomainError::MultipleRoots("a".into(), "b".into()));
}

#[test]
fn given_unknown_parent_when_building_then_reports_both_ids() {
    let records = vec![record("root", None), record("x", Some("ghost"))];

    let err = OrgTreeBuilder::new().build(&records).unwrap_err();

    assert_eq!(
        err,
        DomainError::UnknownParent {
            node_id: "x".into(),
            parent_id: "ghost".into()
        }
    );
}

#[test]
fn given_duplicate_ids_when_building_then_duplicate_node() {
    let records = vec![record("root", None), record("root", Some("root"))];

    let err = OrgTreeBuilder::new().build(&records).unwrap_err();

    assert_eq!(err, DomainError::DuplicateNode("root".into()));
}

#[test]
fn given_detached_loop_when_building_then_cycle_detected() {
    let records = vec![
        record("root", None),
        record("x", Some("y")),
        record("y", Some("x")),
    ];

    let err = OrgTreeBuilder::new().build(&records).unwrap_err();

    assert!(matches!(err, DomainError::CycleDetected(id) if id == "x"));
}

#[test]
fn given_only_loop_when_building_then_cycle_detected() {
    let records = vec![record("x", Some("y")), record("y", Some("x"))];

    let err = OrgTreeBuilder::new().build(&records).unwrap_err();

    assert!(matches!(err, DomainError::CycleDetected(_)));
}

// ============================================================
// Placement
// ============================================================

#[test]
fn given_unilevel_when_placing_then_appended_below_sponsor() {
    let records = vec![record("root", None), record("a", Some("root"))];
    let mut arena = OrgTreeBuilder::new().build(&records).unwrap();

    let placement = arena
        .place_member("root", member("new"), TreeType::Unilevel)
        .unwrap();

    assert_eq!(placement.parent_id, "root");
    assert_eq!(placement.position, None);
    assert_eq!(placement.depth, 1);
    assert!(!placement.spillover);
    let root = arena.to_organization_node().unwrap();
    assert_eq!(root.children.last().unwrap().id, "new");
}

#[test]
fn given_sponsor_with_left_leg_when_placing_binary_then_takes_right_leg() {
    let records = vec![
        record("root", None),
        binary("l", "root", BinaryPosition::Left),
    ];
    let mut arena = OrgTreeBuilder::new().build(&records).unwrap();

    let placement = arena
        .place_member("root", member("new"), TreeType::Binary)
        .unwrap();

    assert_eq!(placement.parent_id, "root");
    assert_eq!(placement.position, Some(BinaryPosition::Right));
    assert!(!placement.spillover);
}

#[test]
fn given_full_first_level_when_placing_binary_then_spills_breadth_first() {
    let records = vec![
        record("root", None),
        binary("l", "root", BinaryPosition::Left),
        binary("r", "root", BinaryPosition::Right),
        binary("ll", "l", BinaryPosition::Left),
        binary("lr", "l", BinaryPosition::Right),
    ];
    let mut arena = OrgTreeBuilder::new().build(&records).unwrap();

    let placement = arena
        .place_member("root", member("new"), TreeType::Binary)
        .unwrap();

    assert_eq!(placement.parent_id, "r");
    assert_eq!(placement.position, Some(BinaryPosition::Left));
    assert_eq!(placement.depth, 2);
    assert!(placement.spillover);
}

#[test]
fn given_unknown_sponsor_when_placing_then_node_not_found() {
    let mut arena = OrgTreeBuilder::new()
        .build(&[record("root", None)])
        .unwrap();

    let err = arena
        .place_member("nobody", member("new"), TreeType::Unilevel)
        .unwrap_err();

    assert_eq!(err, DomainError::NodeNotFound("nobody".into()));
}

#[test]
fn given_existing_id_when_placing_then_duplicate_node() {
    let mut arena = OrgTreeBuilder::new()
        .build(&[record("root", None)])
        .unwrap();

    let err = arena
        .place_member("root", member("root"), TreeType::Unilevel)
        .unwrap_err();

    assert_eq!(err, DomainError::DuplicateNode("root".into()));
}
