//! Filtered-domain lock.
//!
//! Cardinality strictly below the largest one seen is the only observable sign
//! that an external filter narrows this widget's domain. While the lock is on,
//! a cardinality increase is treated as a transient host rebound (the host
//! redelivering an unfiltered snapshot mid cross-filter) and refused.
//!
//! # Invariants
//!
//! - Decreases and equal counts are always accepted.
//! - The lock engages whenever `0 < count < max_item_count`.
//! - The lock releases only at `count == max_item_count` with no selection
//!   reported by the host and none held locally.
//! - Anything else leaves the lock as it was (sticky).

use crate::ReconcileState;

/// Result of checking a candidate cardinality against the lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardinalityDecision {
    Accept,
    /// Locked and the candidate grew: keep the committed domain.
    RejectRebound { last: usize, got: usize },
}

impl CardinalityDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CardinalityDecision::Accept)
    }
}

/// How the lock moved during [`observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockChange {
    Engaged,
    Released,
    Unchanged,
}

/// Read-only check. Does not touch `state`.
pub fn check(state: &ReconcileState, count: usize) -> CardinalityDecision {
    if state.filtered_lock && count > state.last_item_count {
        CardinalityDecision::RejectRebound {
            last: state.last_item_count,
            got: count,
        }
    } else {
        CardinalityDecision::Accept
    }
}

/// Record an accepted (or retained) cardinality and apply the lock rule.
///
/// `host_has_selection` / `local_has_selection` feed the release condition.
pub fn observe(
    state: &mut ReconcileState,
    count: usize,
    host_has_selection: bool,
    local_has_selection: bool,
) -> LockChange {
    state.max_item_count = state.max_item_count.max(count);

    let before = state.filtered_lock;
    if count > 0 {
        if count < state.max_item_count {
            state.filtered_lock = true;
        } else if count == state.max_item_count && !host_has_selection && !local_has_selection {
            state.filtered_lock = false;
        }
    }
    state.last_item_count = count;

    match (before, state.filtered_lock) {
        (false, true) => LockChange::Engaged,
        (true, false) => LockChange::Released,
        _ => LockChange::Unchanged,
    }
}
