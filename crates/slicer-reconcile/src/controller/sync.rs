use std::collections::{BTreeSet, HashSet};

use slicer_domain::{NodeId, Tree};
use slicer_schemas::ColumnSource;
use tracing::debug;

use super::Controller;
use crate::domain::CommittedDomain;
use crate::host::Host;

/// What a host selection callback did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Our own echo; consumed without touching selection.
    Suppressed,
    /// Keys recorded, but there is no committed domain to apply them to.
    Ignored,
    /// Host reported no selection; local selection cleared.
    Cleared { changed: bool },
    /// Local selection now mirrors the reported keys.
    Applied { changed: bool },
}

impl Controller {
    /// Host selection callback with the full key set it holds for this widget.
    ///
    /// The suppression check runs before anything else.
    pub fn apply_external_selection(&mut self, keys: &[String], host: &dyn Host) -> SyncOutcome {
        if self.state.suppress_next_select_callback {
            self.state.suppress_next_select_callback = false;
            debug!(keys = keys.len(), "own selection echo suppressed");
            return SyncOutcome::Suppressed;
        }

        self.state.external_keys = keys.iter().cloned().collect();
        if self.domain.is_empty() {
            return SyncOutcome::Ignored;
        }

        if keys.is_empty() {
            let changed = self.domain.clear_selection();
            if self.domain.tree().is_some() {
                self.state.active_selection_level = None;
            }
            debug!(changed, "external selection cleared");
            return SyncOutcome::Cleared { changed };
        }

        let changed = match &mut self.domain {
            CommittedDomain::Empty => false,
            CommittedDomain::Flat { items, .. } => {
                let mut changed = false;
                for item in items.iter_mut() {
                    let selected = self.state.external_keys.contains(item.handle.key());
                    changed |= item.selected != selected;
                    item.selected = selected;
                }
                changed
            }
            CommittedDomain::Tree { tree, sources } => {
                let (changed, level) = mirror_tree(tree, sources, &self.state.external_keys, host);
                self.state.active_selection_level = level;
                changed
            }
        };

        if self.domain.count() < self.state.max_item_count && !self.state.filtered_lock {
            debug!(
                count = self.domain.count(),
                max = self.state.max_item_count,
                "filtered lock engaged by external selection"
            );
            self.state.filtered_lock = true;
        }
        debug!(keys = keys.len(), changed, "external selection applied");
        SyncOutcome::Applied { changed }
    }
}

/// Select the tree nodes whose handle is in `keys`, keeping only the deepest
/// matched level. Returns whether anything changed and the level kept.
fn mirror_tree(
    tree: &mut Tree,
    sources: &[ColumnSource],
    keys: &BTreeSet<String>,
    host: &dyn Host,
) -> (bool, Option<i32>) {
    let order = tree.preorder();
    let matched: Vec<(NodeId, i32)> = order
        .iter()
        .filter_map(|id| {
            let node = tree.node(*id);
            let source = usize::try_from(node.level)
                .ok()
                .and_then(|l| sources.get(l))?;
            let handle = host.selection_handle(source, &tree.path_of(*id));
            keys.contains(handle.key()).then_some((*id, node.level))
        })
        .collect();

    let level = matched.iter().map(|(_, l)| *l).max();
    let keep: HashSet<NodeId> = matched
        .iter()
        .filter(|(_, l)| Some(*l) == level)
        .map(|(id, _)| *id)
        .collect();

    let mut changed = false;
    for id in order {
        let selected = keep.contains(&id);
        if tree.node(id).selected != selected {
            tree.set_selected(id, selected);
            changed = true;
        }
    }
    (changed, level)
}
