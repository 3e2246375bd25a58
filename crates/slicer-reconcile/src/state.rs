use std::collections::BTreeSet;

/// Cross-refresh memory of one mounted widget.
///
/// Created once by the caller and injected into the controller. Fully reset
/// when the bound field is removed; partially reset when it is swapped.
///
/// # Invariants
///
/// - `last_item_count <= max_item_count` after every refresh.
/// - `max_item_count` never decreases except on reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileState {
    /// Identity of the bound field (query names), `None` while unbound.
    pub bound_field: Option<String>,
    /// Largest cardinality observed for the current binding.
    pub max_item_count: usize,
    /// Cardinality observed on the previous refresh.
    pub last_item_count: usize,
    /// The visible domain is known to be narrowed by an external filter;
    /// cardinality increases are refused while set.
    pub filtered_lock: bool,
    /// Fingerprint of the committed label sequence.
    pub items_signature: String,
    /// A default selection was already evaluated for this data round.
    pub did_initial_force: bool,
    /// Last selection key set the host reported for this widget.
    pub external_keys: BTreeSet<String>,
    /// One-shot: the next host selection callback is our own echo.
    pub suppress_next_select_callback: bool,
    /// Tree mode: the only level allowed to carry selected nodes.
    pub active_selection_level: Option<i32>,
}

impl ReconcileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything back to zero/empty/false.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Field swapped for a different one: forget cardinality, signature and
    /// selection memory. A pending echo suppression survives, since the host
    /// may still deliver the callback for a write issued before the swap.
    pub fn reset_for_swap(&mut self) {
        let suppress = self.suppress_next_select_callback;
        self.reset();
        self.suppress_next_select_callback = suppress;
    }

    pub fn is_bound(&self) -> bool {
        self.bound_field.is_some()
    }
}
