//! Scenario: Empty Selection Withdraws The Filter
//!
//! # Invariants under test
//!
//! 1. Multiple mode: deselecting the only selected item issues a withdrawal
//!    (no descriptor, remove action), never a zero-value membership filter.
//! 2. The withdrawal carries this widget's scope, once per deselect-to-empty.
//! 3. An unresolvable column skips filter emission while the local selection
//!    still changes.
//! 4. Every merge carries the basic "In" descriptor for the selected labels.

use slicer_config::{Propagation, SelectionMode, Settings, ViewMode};
use slicer_filter::{FilterAction, BASIC_FILTER_SCHEMA};
use slicer_reconcile::{Controller, ReconcileState};
use slicer_schemas::{Column, ColumnSource, DomainSnapshot, ScopeId};
use slicer_testkit::{flat_snapshot, RecordingHost};

fn controller(scope: ScopeId) -> Controller {
    let settings = Settings {
        selection_mode: SelectionMode::Multiple,
        propagation: Propagation::Filter,
        ..Settings::default()
    };
    Controller::new(ViewMode::Flat, settings, ReconcileState::new(), scope)
}

#[test]
fn deselecting_last_item_withdraws() {
    let scope = ScopeId::from_name("withdraw");
    let mut host = RecordingHost::new();
    let mut c = controller(scope);
    c.refresh(&flat_snapshot("Sales.Region", &["East", "West"]), &mut host);

    c.click_item(1, &mut host);
    let merge = host.last_filter().unwrap();
    assert_eq!(merge.action, FilterAction::Merge);
    let desc = merge.descriptor.as_ref().unwrap();
    assert_eq!(desc.schema, BASIC_FILTER_SCHEMA);
    assert_eq!(desc.operator, "In");
    assert_eq!(desc.target.table, "Sales");
    assert_eq!(desc.target.column, "Region");
    assert_eq!(desc.values, vec!["West".to_string()]);

    c.click_item(1, &mut host);
    let last = host.last_filter().unwrap();
    assert!(last.is_withdrawal());
    assert_eq!(last.scope, scope);
    assert!(c.outstanding_filter().is_none());
    assert_eq!(host.filter_calls.len(), 2);
}

#[test]
fn each_deselect_withdraws_exactly_once() {
    let mut host = RecordingHost::new();
    let mut c = controller(ScopeId::from_name("idle"));
    c.refresh(&flat_snapshot("Sales.Region", &["East", "West"]), &mut host);

    c.click_item(0, &mut host);
    c.click_item(0, &mut host);
    assert_eq!(host.filter_calls.len(), 2);

    // Select and deselect a different item: one merge, one withdrawal.
    c.click_item(1, &mut host);
    c.click_item(1, &mut host);
    assert_eq!(host.filter_calls.len(), 4);
    assert_eq!(
        host.filter_calls.iter().filter(|f| f.is_withdrawal()).count(),
        2
    );
}

#[test]
fn unresolved_target_skips_filter_but_keeps_selection() {
    let mut host = RecordingHost::new();
    let mut c = controller(ScopeId::from_name("unresolved"));
    // Measure-like query name and no display name: nothing to target.
    let snap = DomainSnapshot::single(Column::new(
        ColumnSource::new("Sum(Sales.Amount)", ""),
        vec!["1".into(), "2".into()],
    ));
    c.refresh(&snap, &mut host);

    c.click_item(0, &mut host);
    assert!(host.filter_calls.is_empty());
    assert_eq!(c.selected_labels(), vec!["1".to_string()]);
}
