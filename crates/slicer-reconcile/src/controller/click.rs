use slicer_domain::NodeId;
use tracing::debug;

use super::Controller;
use crate::domain::CommittedDomain;
use crate::host::Host;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Index out of range, unknown node, or wrong view mode.
    Ignored,
    /// Single mode with forced selection and the value is already selected.
    NoOp,
    /// Leaf-only policy: a non-leaf click expands or collapses instead.
    Toggled,
    /// Selection changed and was propagated.
    Selected { selected: usize },
}

impl Controller {
    /// Flat mode: user clicked item `index`.
    pub fn click_item(&mut self, index: usize, host: &mut dyn Host) -> ClickOutcome {
        let single = self.settings.is_single();
        let force = self.settings.force_selection;

        let CommittedDomain::Flat { items, .. } = &mut self.domain else {
            return ClickOutcome::Ignored;
        };
        let Some(was_selected) = items.get(index).map(|i| i.selected) else {
            return ClickOutcome::Ignored;
        };
        if single && force && was_selected {
            return ClickOutcome::NoOp;
        }

        if single {
            for (i, item) in items.iter_mut().enumerate() {
                item.selected = i == index;
            }
        } else {
            items[index].selected = !was_selected;
        }
        let selected = items.iter().filter(|i| i.selected).count();
        debug!(index, selected, "item click");

        self.user_committed(host);
        ClickOutcome::Selected { selected }
    }

    /// Tree mode: user clicked node `id`.
    ///
    /// The node's level becomes the active selection level; every selection
    /// on any other level is cleared in the same step.
    pub fn click_node(&mut self, id: NodeId, host: &mut dyn Host) -> ClickOutcome {
        if !self.domain.contains_node(id) {
            return ClickOutcome::Ignored;
        }
        let single = self.settings.is_single();
        let force = self.settings.force_selection;
        let leaf_only = self.settings.leaf_only;

        let Some((tree, _)) = self.domain.tree_mut() else {
            return ClickOutcome::Ignored;
        };
        let node = tree.node(id);
        let (level, is_leaf, was_selected) = (node.level, node.is_leaf, node.selected);

        if leaf_only && !is_leaf {
            tree.toggle_expanded(id);
            return ClickOutcome::Toggled;
        }
        if single && force && was_selected {
            return ClickOutcome::NoOp;
        }

        tree.clear_levels_except(level);
        if single {
            tree.clear_selection();
            tree.set_selected(id, true);
        } else {
            tree.set_selected(id, !was_selected);
        }
        let selected = tree.selected_nodes().len();
        debug!(level, selected, "node click");

        self.state.active_selection_level = Some(level);
        self.user_committed(host);
        ClickOutcome::Selected { selected }
    }

    /// Expand or collapse a non-leaf node. No selection effect.
    pub fn toggle_node(&mut self, id: NodeId) -> bool {
        if !self.domain.contains_node(id) {
            return false;
        }
        match self.domain.tree_mut() {
            Some((tree, _)) if !tree.node(id).is_leaf => {
                tree.toggle_expanded(id);
                true
            }
            _ => false,
        }
    }

    /// The user's own action is trusted over the cardinality heuristic.
    fn user_committed(&mut self, host: &mut dyn Host) {
        self.state.filtered_lock = true;
        self.state.did_initial_force = true;
        self.propagate(host);
    }
}
