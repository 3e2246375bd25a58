//! Scenario: Tree Rebuild Preserves Selected Paths
//!
//! # Invariants under test
//!
//! 1. A selected node at path [A,B] stays selected across a full rebuild that
//!    still contains [A,B].
//! 2. A rebuild without [A,B] drops the selection silently and clears the
//!    active level.
//! 3. Expand state carries forward by path the same way.
//! 4. Empty levels are skipped: a populated hierarchy under an empty middle
//!    column still builds, with leaves on the last populated level.

use slicer_config::{SelectionMode, Settings, ViewMode};
use slicer_reconcile::{Controller, ReconcileState, RefreshDecision};
use slicer_schemas::{DomainSnapshot, ScopeId};
use slicer_testkit::{tree_snapshot, RecordingHost};

fn controller() -> Controller {
    let settings = Settings {
        selection_mode: SelectionMode::Multiple,
        leaf_only: false,
        ..Settings::default()
    };
    Controller::new(
        ViewMode::Tree,
        settings,
        ReconcileState::new(),
        ScopeId::from_name("rebuild"),
    )
}

fn path(p: &[&str]) -> Vec<String> {
    p.iter().map(|s| s.to_string()).collect()
}

fn snapshot(countries: &[&str], cities: &[&str]) -> DomainSnapshot {
    tree_snapshot(&[("Geo.Country", countries), ("Geo.City", cities)])
}

#[test]
fn selected_path_survives_rebuild_that_keeps_it() {
    let mut host = RecordingHost::new();
    let mut c = controller();
    c.refresh(&snapshot(&["A", "A", "C"], &["B", "D", "E"]), &mut host);

    let ab = c.tree().unwrap().find_path(&path(&["A", "B"])).unwrap();
    c.click_node(ab, &mut host);
    let a = c.tree().unwrap().find_path(&path(&["A"])).unwrap();
    c.toggle_node(a);

    // Same cardinality (3 leaves), different content: committed.
    let out = c.refresh(&snapshot(&["A", "C", "C"], &["B", "E", "F"]), &mut host);
    assert_eq!(out.decision, RefreshDecision::Committed);

    let tree = c.tree().unwrap();
    let ab = tree.find_path(&path(&["A", "B"])).unwrap();
    assert!(tree.node(ab).selected);
    let a = tree.find_path(&path(&["A"])).unwrap();
    assert!(tree.node(a).expanded);
    assert_eq!(c.state().active_selection_level, Some(1));
}

#[test]
fn selection_dropped_when_path_disappears() {
    let mut host = RecordingHost::new();
    let mut c = controller();
    c.refresh(&snapshot(&["A", "A", "C"], &["B", "D", "E"]), &mut host);

    let ab = c.tree().unwrap().find_path(&path(&["A", "B"])).unwrap();
    c.click_node(ab, &mut host);

    // Fewer leaves: accepted even though the click engaged the lock.
    let out = c.refresh(&snapshot(&["C", "C"], &["E", "F"]), &mut host);
    assert_eq!(out.decision, RefreshDecision::Committed);

    let tree = c.tree().unwrap();
    assert!(tree.find_path(&path(&["A", "B"])).is_none());
    assert!(!tree.any_selected());
    assert_eq!(c.state().active_selection_level, None);
}

#[test]
fn empty_middle_level_is_skipped() {
    let mut host = RecordingHost::new();
    let mut c = controller();
    let snap = tree_snapshot(&[
        ("Geo.Country", &["US", "FR"]),
        ("Geo.State", &[]),
        ("Geo.City", &["NYC", "Paris"]),
    ]);
    c.refresh(&snap, &mut host);

    let tree = c.tree().unwrap();
    assert_eq!(tree.depth(), 2);
    let nyc = tree.find_path(&path(&["US", "NYC"])).unwrap();
    assert!(tree.node(nyc).is_leaf);
    assert_eq!(c.state().max_item_count, 2);
}
