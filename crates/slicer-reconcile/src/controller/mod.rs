//! Reconciliation controller.
//!
//! One controller per mounted widget. It owns the committed domain and the
//! injected [`ReconcileState`], and borrows the host for each entry point:
//!
//! - [`Controller::refresh`]: a new snapshot arrived
//! - [`Controller::click_item`] / [`Controller::click_node`]: user selection
//! - [`Controller::toggle_node`]: expand/collapse only
//! - [`Controller::apply_external_selection`]: host selection callback
//!
//! # Invariants
//!
//! - Every own selection write arms `suppress_next_select_callback` in the
//!   same call that issues it.
//! - Tree mode: selected nodes only ever sit on `active_selection_level`.
//! - A user click always engages the filtered lock.
//! - An emitted filter is never withdrawn on field removal.

mod click;
mod refresh;
mod sync;

pub use click::ClickOutcome;
pub use refresh::{RefreshDecision, RefreshOutcome};
pub use sync::SyncOutcome;

use std::collections::HashSet;

use slicer_config::{Settings, ViewMode};
use slicer_domain::{items, search, NodeId, Tree, ValueItem};
use slicer_filter::{FilterEmitter, FilterTarget};
use slicer_schemas::{ColumnSource, ScopeId, SelectionHandle};
use tracing::debug;

use crate::domain::CommittedDomain;
use crate::host::{Host, SelectionWrite};
use crate::ReconcileState;

pub struct Controller {
    mode: ViewMode,
    settings: Settings,
    scope: ScopeId,
    state: ReconcileState,
    domain: CommittedDomain,
    emitter: FilterEmitter,
    search: String,
}

/// What the committed selection looks like to the host.
struct Projection {
    handles: Vec<SelectionHandle>,
    labels: Vec<String>,
    source: Option<ColumnSource>,
}

impl Controller {
    pub fn new(mode: ViewMode, settings: Settings, state: ReconcileState, scope: ScopeId) -> Self {
        Self {
            mode,
            settings,
            scope,
            state,
            domain: CommittedDomain::Empty,
            emitter: FilterEmitter::new(),
            search: String::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn state(&self) -> &ReconcileState {
        &self.state
    }

    pub fn domain(&self) -> &CommittedDomain {
        &self.domain
    }

    pub fn items(&self) -> &[ValueItem] {
        self.domain.items()
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.domain.tree()
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.domain.selected_labels()
    }

    /// Target of the filter this widget currently holds on the host.
    pub fn outstanding_filter(&self) -> Option<&FilterTarget> {
        self.emitter.outstanding()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // -----------------------------------------------------------------------
    // Settings and search
    // -----------------------------------------------------------------------

    /// Takes effect from the next interaction; nothing is re-propagated.
    pub fn set_settings(&mut self, settings: Settings) {
        if settings != self.settings {
            debug!(
                single = settings.is_single(),
                force = settings.force_selection,
                leaf_only = settings.leaf_only,
                propagation = settings.propagation.as_str(),
                "settings updated"
            );
        }
        self.settings = settings;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    fn effective_query(&self) -> &str {
        if self.settings.search_enabled {
            &self.search
        } else {
            ""
        }
    }

    /// Flat mode: indices of items matching the search text.
    pub fn visible_items(&self) -> Vec<usize> {
        let labels: Vec<&str> = self.items().iter().map(|i| i.label.as_str()).collect();
        search::visible_indices(&labels, self.effective_query())
    }

    /// Tree mode: nodes to render, in document order.
    ///
    /// Without a query this follows expand state. With one, a node shows when
    /// it or any descendant matches, regardless of expand state.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let Some(tree) = self.tree() else {
            return Vec::new();
        };
        let query = self.effective_query();
        if query.trim().is_empty() {
            return tree.visible();
        }

        let mut keep: HashSet<NodeId> = HashSet::new();
        for id in tree.preorder() {
            if !search::matches(&tree.node(id).label, query) {
                continue;
            }
            let mut cur = Some(id);
            while let Some(c) = cur {
                if c == tree.root() || !keep.insert(c) {
                    break;
                }
                cur = tree.node(c).parent();
            }
        }
        tree.preorder()
            .into_iter()
            .filter(|id| keep.contains(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    /// `has_selection()` when the host can tell. Otherwise the host is assumed
    /// to hold a selection if it reported keys, or if `held_locally` (a
    /// selection this widget propagated before the current refresh).
    fn host_has_selection(&self, host: &dyn Host, held_locally: bool) -> bool {
        host.has_selection()
            .unwrap_or(held_locally || !self.state.external_keys.is_empty())
    }

    fn projection(&self, host: &dyn Host) -> Projection {
        match &self.domain {
            CommittedDomain::Empty => Projection {
                handles: Vec::new(),
                labels: Vec::new(),
                source: None,
            },
            CommittedDomain::Flat { source, items } => Projection {
                handles: items::selected_handles(items),
                labels: items::selected_labels(items),
                source: Some(source.clone()),
            },
            CommittedDomain::Tree { tree, .. } => {
                let selected = tree.selected_nodes();
                let mut handles = Vec::with_capacity(selected.len());
                let mut labels = Vec::with_capacity(selected.len());
                for id in &selected {
                    let node = tree.node(*id);
                    if let Some(src) = self.domain.level_source(node.level) {
                        handles.push(host.selection_handle(src, &tree.path_of(*id)));
                    }
                    labels.push(node.label.clone());
                }
                let level = self
                    .state
                    .active_selection_level
                    .or_else(|| selected.first().map(|id| tree.node(*id).level));
                Projection {
                    handles,
                    labels,
                    source: level.and_then(|l| self.domain.level_source(l)).cloned(),
                }
            }
        }
    }

    /// Push the committed selection through the configured channels.
    fn propagate(&mut self, host: &mut dyn Host) {
        let Projection {
            handles,
            labels,
            source,
        } = self.projection(host);

        if self.settings.propagation.writes_selection() {
            let write = if handles.is_empty() {
                SelectionWrite::Clear
            } else {
                SelectionWrite::Select {
                    handles,
                    extend_current: !self.settings.is_single(),
                }
            };
            self.state.suppress_next_select_callback = true;
            host.write_selection(write);
        }

        if self.settings.propagation.writes_filter() {
            let outcome =
                self.emitter
                    .emit(&labels, source.as_ref(), host.as_filter_host(), &self.scope);
            debug!(?outcome, "filter emission");
        }
    }
}
