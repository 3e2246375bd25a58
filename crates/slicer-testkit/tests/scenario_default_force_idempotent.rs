//! Scenario: Default Selection Force Is Idempotent
//!
//! # Invariants under test
//!
//! 1. Single + force-on, 3 items, no host selection: the first refresh selects
//!    exactly item[0] and issues exactly one selection write.
//! 2. A second refresh with identical data issues zero further writes.
//! 3. The echo of the forced write is suppressed and does not re-arm the force.
//! 4. A host that reports an active selection blocks the force.
//! 5. When the first item's key is already reported, no write is issued but
//!    the force is still marked as evaluated.
//! 6. Multiple mode never forces.
//! 7. Tree mode forces the first leaf in document order and expands its
//!    ancestors.

use slicer_config::{SelectionMode, Settings, ViewMode};
use slicer_reconcile::{
    Controller, ReconcileState, RefreshDecision, RefreshOutcome, SelectionWrite, SyncOutcome,
};
use slicer_schemas::{ScopeId, SelectionHandle};
use slicer_testkit::{flat_snapshot, tree_snapshot, RecordingHost};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn controller(mode: ViewMode, settings: Settings) -> Controller {
    Controller::new(mode, settings, ReconcileState::new(), ScopeId::from_name("force"))
}

fn regions() -> slicer_schemas::DomainSnapshot {
    flat_snapshot("Sales.Region", &["East", "West", "North"])
}

// ---------------------------------------------------------------------------
// 1 + 2. One write, then none
// ---------------------------------------------------------------------------

#[test]
fn first_refresh_forces_item_zero_once() {
    let mut host = RecordingHost::new();
    let mut c = controller(ViewMode::Flat, Settings::default());

    let out = c.refresh(&regions(), &mut host);
    assert_eq!(
        out,
        RefreshOutcome {
            decision: RefreshDecision::Committed,
            forced: true
        }
    );
    assert_eq!(c.selected_labels(), vec!["East".to_string()]);
    assert_eq!(host.writes_len(), 1);
    assert_eq!(
        host.last_write(),
        Some(&SelectionWrite::Select {
            handles: vec![SelectionHandle::new("Sales.Region=East")],
            extend_current: false,
        })
    );

    let again = c.refresh(&regions(), &mut host);
    assert_eq!(
        again,
        RefreshOutcome {
            decision: RefreshDecision::Unchanged,
            forced: false
        }
    );
    assert_eq!(host.writes_len(), 1, "identical refresh must not write again");
}

// ---------------------------------------------------------------------------
// 3. Echo of the forced write
// ---------------------------------------------------------------------------

#[test]
fn echo_of_forced_write_is_suppressed_and_does_not_reforce() {
    let mut host = RecordingHost::new();
    let mut c = controller(ViewMode::Flat, Settings::default());

    c.refresh(&regions(), &mut host);
    assert!(c.state().suppress_next_select_callback);

    let echo = host.echo();
    assert_eq!(c.apply_external_selection(&echo, &host), SyncOutcome::Suppressed);
    assert!(!c.state().suppress_next_select_callback);

    c.refresh(&regions(), &mut host);
    assert_eq!(host.writes_len(), 1);
    assert_eq!(c.selected_labels(), vec!["East".to_string()]);
}

// ---------------------------------------------------------------------------
// 4. Host already holds a selection
// ---------------------------------------------------------------------------

#[test]
fn host_selection_blocks_force() {
    let mut host = RecordingHost::new();
    host.reported_selection = Some(true);
    let mut c = controller(ViewMode::Flat, Settings::default());

    let out = c.refresh(&regions(), &mut host);
    assert!(!out.forced);
    assert!(c.selected_labels().is_empty());
    assert_eq!(host.writes_len(), 0);
    assert!(!c.state().did_initial_force);
}

// ---------------------------------------------------------------------------
// 5. First key already reported
// ---------------------------------------------------------------------------

#[test]
fn first_key_already_reported_skips_write_but_marks_evaluated() {
    let mut host = RecordingHost::new();
    host.reported_selection = Some(false);
    let mut c = controller(ViewMode::Flat, Settings::default());

    // Callback before any data: keys are recorded, nothing to apply yet.
    let keys = vec![RecordingHost::key_for("Sales.Region", &["East"])];
    assert_eq!(c.apply_external_selection(&keys, &host), SyncOutcome::Ignored);

    let out = c.refresh(&regions(), &mut host);
    assert!(!out.forced);
    assert_eq!(host.writes_len(), 0);
    assert!(c.state().did_initial_force);
}

// ---------------------------------------------------------------------------
// 6. Multiple mode
// ---------------------------------------------------------------------------

#[test]
fn multiple_mode_never_forces() {
    let mut host = RecordingHost::new();
    let settings = Settings {
        selection_mode: SelectionMode::Multiple,
        ..Settings::default()
    };
    let mut c = controller(ViewMode::Flat, settings);

    let out = c.refresh(&regions(), &mut host);
    assert!(!out.forced);
    assert!(c.selected_labels().is_empty());
    assert_eq!(host.writes_len(), 0);
}

// ---------------------------------------------------------------------------
// 7. Tree mode
// ---------------------------------------------------------------------------

#[test]
fn tree_forces_first_leaf_and_expands_ancestors() {
    let mut host = RecordingHost::new();
    let mut c = controller(ViewMode::Tree, Settings::default());

    let snap = tree_snapshot(&[
        ("Geo.Country", &["US", "US", "FR"]),
        ("Geo.City", &["NYC", "LA", "Paris"]),
    ]);
    let out = c.refresh(&snap, &mut host);
    assert!(out.forced);
    assert_eq!(c.selected_labels(), vec!["NYC".to_string()]);
    assert_eq!(c.state().active_selection_level, Some(1));

    let tree = c.tree().unwrap();
    let us = tree.find_path(&["US".to_string()]).unwrap();
    assert!(tree.node(us).expanded);

    assert_eq!(
        host.last_write(),
        Some(&SelectionWrite::Select {
            handles: vec![SelectionHandle::new("Geo.City=US/NYC")],
            extend_current: false,
        })
    );
}
