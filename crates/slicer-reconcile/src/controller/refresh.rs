use slicer_config::ViewMode;
use slicer_domain::{
    build_items, extract_flat, extract_levels, field_identity, labels_signature, tree_signature,
    FlatCandidate, Tree,
};
use slicer_schemas::{ColumnSource, DomainSnapshot};
use tracing::debug;

use super::Controller;
use crate::domain::CommittedDomain;
use crate::host::{Host, SelectionWrite};
use crate::lock::{self, CardinalityDecision, LockChange};

/// What a refresh did to the committed domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshDecision {
    /// No column bound: state reset, domain cleared.
    FieldRemoved,
    /// Column bound but delivered zero values: nothing changed.
    Empty,
    /// Locked and cardinality grew: prior domain kept.
    Rejected { last: usize, got: usize },
    /// Accepted, same content signature.
    Unchanged,
    /// Accepted and committed as the new domain.
    Committed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub decision: RefreshDecision,
    /// A default selection was written during this refresh.
    pub forced: bool,
}

impl RefreshOutcome {
    fn quiet(decision: RefreshDecision) -> Self {
        Self {
            decision,
            forced: false,
        }
    }
}

enum Candidate {
    Flat(FlatCandidate),
    Tree {
        sources: Vec<ColumnSource>,
        tree: Tree,
    },
}

impl Candidate {
    fn count(&self) -> usize {
        match self {
            Candidate::Flat(flat) => flat.count(),
            Candidate::Tree { tree, .. } => tree.leaf_count(),
        }
    }

    fn signature(&self) -> String {
        match self {
            Candidate::Flat(flat) => labels_signature(&flat.labels),
            Candidate::Tree { tree, .. } => tree_signature(tree),
        }
    }
}

impl Controller {
    /// Reconcile a freshly delivered snapshot.
    pub fn refresh(&mut self, snapshot: &DomainSnapshot, host: &mut dyn Host) -> RefreshOutcome {
        let Some(identity) = field_identity(snapshot) else {
            self.field_removed(host);
            return RefreshOutcome::quiet(RefreshDecision::FieldRemoved);
        };

        if let Some(bound) = self.state.bound_field.as_deref() {
            if bound != identity {
                debug!(from = bound, to = %identity, "bound field swapped");
                self.state.reset_for_swap();
                self.domain = CommittedDomain::Empty;
            }
        }
        self.state.bound_field = Some(identity);

        let Some(candidate) = self.extract(snapshot) else {
            return RefreshOutcome::quiet(RefreshDecision::Empty);
        };
        let count = candidate.count();
        if count == 0 {
            debug!("bound field delivered no values");
            return RefreshOutcome::quiet(RefreshDecision::Empty);
        }

        // Own writes come back suppressed and never reach `external_keys`.
        let held_before = self.domain.any_selected();

        let (decision, effective) = match lock::check(&self.state, count) {
            CardinalityDecision::RejectRebound { last, got } => {
                debug!(last, got, "cardinality rebound rejected while locked");
                (RefreshDecision::Rejected { last, got }, last)
            }
            CardinalityDecision::Accept => (self.commit(candidate, host), count),
        };

        let host_has_selection = self.host_has_selection(host, held_before);
        let local_has_selection = self.domain.any_selected();
        match lock::observe(
            &mut self.state,
            effective,
            host_has_selection,
            local_has_selection,
        ) {
            LockChange::Engaged => debug!(
                count = effective,
                max = self.state.max_item_count,
                "filtered lock engaged"
            ),
            LockChange::Released => debug!(count = effective, "filtered lock released"),
            LockChange::Unchanged => {}
        }

        let forced = self.force_default(host, host_has_selection);
        RefreshOutcome { decision, forced }
    }

    fn extract(&self, snapshot: &DomainSnapshot) -> Option<Candidate> {
        match self.mode {
            ViewMode::Flat => extract_flat(snapshot).map(Candidate::Flat),
            ViewMode::Tree => extract_levels(snapshot).map(|levels| Candidate::Tree {
                sources: levels.sources(),
                tree: Tree::from_candidate(&levels),
            }),
        }
    }

    /// Commit `candidate` if its content differs from the committed domain.
    fn commit(&mut self, candidate: Candidate, host: &dyn Host) -> RefreshDecision {
        let signature = candidate.signature();
        if signature == self.state.items_signature {
            return RefreshDecision::Unchanged;
        }

        let previous = std::mem::take(&mut self.domain);
        self.domain = match candidate {
            Candidate::Flat(flat) => {
                let items = build_items(
                    &flat.labels,
                    |label| host.selection_handle(&flat.source, &[label.to_string()]),
                    previous.items(),
                );
                CommittedDomain::Flat {
                    source: flat.source,
                    items,
                }
            }
            Candidate::Tree { sources, mut tree } => {
                if let Some(prev) = previous.tree() {
                    tree.restore_from(prev);
                }
                let active = tree.selected_levels().last().copied();
                if let Some(level) = active {
                    tree.clear_levels_except(level);
                }
                self.state.active_selection_level = active;
                CommittedDomain::Tree { sources, tree }
            }
        };

        debug!(count = self.domain.count(), "domain committed");
        self.state.items_signature = signature;
        self.state.did_initial_force = false;
        RefreshDecision::Committed
    }

    /// Bound column disappeared. Host selection is cleared (its handles are
    /// stale); an emitted filter stays, since its column may still matter to
    /// the report.
    fn field_removed(&mut self, host: &mut dyn Host) {
        let was_bound = self.state.is_bound();
        let had_selection = self.domain.any_selected() || !self.state.external_keys.is_empty();

        self.state.reset();
        self.domain = CommittedDomain::Empty;
        self.search.clear();

        if !was_bound {
            return;
        }
        debug!(had_selection, "bound field removed; state reset");
        // The echo of this clear lands on an empty domain, so no suppression
        // is armed and the state stays fully reset.
        if had_selection && self.settings.propagation.writes_selection() {
            host.write_selection(SelectionWrite::Clear);
        }
    }

    /// Default-selection rule. Returns whether a selection was written.
    fn force_default(&mut self, host: &mut dyn Host, host_has_selection: bool) -> bool {
        if !(self.settings.is_single() && self.settings.force_selection)
            || self.domain.is_empty()
            || host_has_selection
            || self.state.did_initial_force
        {
            return false;
        }
        if !(self.state.filtered_lock || self.domain.count() == self.state.max_item_count) {
            return false;
        }
        self.state.did_initial_force = true;

        let forced = match &mut self.domain {
            CommittedDomain::Empty => false,
            CommittedDomain::Flat { items, .. } => {
                let eligible = items
                    .first()
                    .is_some_and(|first| !self.state.external_keys.contains(first.handle.key()));
                if eligible {
                    for (i, item) in items.iter_mut().enumerate() {
                        item.selected = i == 0;
                    }
                }
                eligible
            }
            CommittedDomain::Tree { tree, sources } => {
                let Some(leaf) = tree.first_leaf() else {
                    return false;
                };
                let level = tree.node(leaf).level;
                let key = usize::try_from(level)
                    .ok()
                    .and_then(|l| sources.get(l))
                    .map(|src| host.selection_handle(src, &tree.path_of(leaf)));
                match key {
                    Some(h) if !self.state.external_keys.contains(h.key()) => {
                        tree.clear_selection();
                        tree.set_selected(leaf, true);
                        tree.expand_ancestors(leaf);
                        self.state.active_selection_level = Some(level);
                        true
                    }
                    _ => false,
                }
            }
        };

        if forced {
            debug!(labels = ?self.domain.selected_labels(), "default selection forced");
            self.propagate(host);
        }
        forced
    }
}
