//! Deterministic in-memory host.
//!
//! Records every selection write and filter call in order, mints readable
//! handle keys, and tracks what the host would report back so tests can
//! synthesize the echo callback. No event loop, no randomness.

use std::collections::BTreeSet;

use serde::Serialize;
use slicer_filter::{FilterAction, FilterDescriptor, FilterHost};
use slicer_reconcile::{SelectionHost, SelectionWrite};
use slicer_schemas::{ColumnSource, ScopeId, SelectionHandle};

/// One recorded `apply_filter` call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterCall {
    pub descriptor: Option<FilterDescriptor>,
    pub scope: ScopeId,
    pub action: FilterAction,
}

impl FilterCall {
    pub fn is_withdrawal(&self) -> bool {
        self.descriptor.is_none() && self.action == FilterAction::Remove
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    pub selection_writes: Vec<SelectionWrite>,
    pub filter_calls: Vec<FilterCall>,
    /// Answer for `has_selection`. `None` lets the controller fall back.
    pub reported_selection: Option<bool>,
    held: BTreeSet<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key minted for `path` under the column named `query_name`.
    pub fn key_for(query_name: &str, path: &[&str]) -> String {
        format!("{}={}", query_name, path.join("/"))
    }

    /// Keys the host currently holds for the widget: what its selection
    /// callback would deliver right now.
    pub fn echo(&self) -> Vec<String> {
        self.held.iter().cloned().collect()
    }

    /// Simulate another widget (or a bookmark) replacing the held selection.
    pub fn set_held(&mut self, keys: &[String]) {
        self.held = keys.iter().cloned().collect();
    }

    pub fn writes_len(&self) -> usize {
        self.selection_writes.len()
    }

    pub fn last_write(&self) -> Option<&SelectionWrite> {
        self.selection_writes.last()
    }

    pub fn last_filter(&self) -> Option<&FilterCall> {
        self.filter_calls.last()
    }

    /// Drain everything recorded so far.
    pub fn take_calls(&mut self) -> (Vec<SelectionWrite>, Vec<FilterCall>) {
        (
            std::mem::take(&mut self.selection_writes),
            std::mem::take(&mut self.filter_calls),
        )
    }
}

impl SelectionHost for RecordingHost {
    fn selection_handle(&self, source: &ColumnSource, path: &[String]) -> SelectionHandle {
        SelectionHandle::new(format!("{}={}", source.query_name, path.join("/")))
    }

    fn write_selection(&mut self, write: SelectionWrite) {
        match &write {
            // The widget always sends its complete selected set.
            SelectionWrite::Select { handles, .. } => {
                self.held = handles.iter().map(|h| h.key().to_string()).collect();
            }
            SelectionWrite::Clear => self.held.clear(),
        }
        self.selection_writes.push(write);
    }

    fn has_selection(&self) -> Option<bool> {
        self.reported_selection
    }
}

impl FilterHost for RecordingHost {
    fn apply_filter(
        &mut self,
        filter: Option<&FilterDescriptor>,
        scope: &ScopeId,
        action: FilterAction,
    ) {
        self.filter_calls.push(FilterCall {
            descriptor: filter.cloned(),
            scope: *scope,
            action,
        });
    }
}
