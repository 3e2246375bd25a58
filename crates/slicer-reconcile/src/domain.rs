use slicer_domain::{items, NodeId, Tree, ValueItem};
use slicer_schemas::ColumnSource;

/// The domain currently committed for rendering and selection.
#[derive(Clone, Debug, Default)]
pub enum CommittedDomain {
    #[default]
    Empty,
    Flat {
        source: ColumnSource,
        items: Vec<ValueItem>,
    },
    Tree {
        /// One source per populated level, aligned with node levels.
        sources: Vec<ColumnSource>,
        tree: Tree,
    },
}

impl CommittedDomain {
    /// Cardinality: item count (flat) or distinct leaf paths (tree).
    pub fn count(&self) -> usize {
        match self {
            CommittedDomain::Empty => 0,
            CommittedDomain::Flat { items, .. } => items.len(),
            CommittedDomain::Tree { tree, .. } => tree.leaf_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn any_selected(&self) -> bool {
        match self {
            CommittedDomain::Empty => false,
            CommittedDomain::Flat { items, .. } => items::any_selected(items),
            CommittedDomain::Tree { tree, .. } => tree.any_selected(),
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        match self {
            CommittedDomain::Empty => false,
            CommittedDomain::Flat { items, .. } => {
                let mut changed = false;
                for item in items.iter_mut().filter(|i| i.selected) {
                    item.selected = false;
                    changed = true;
                }
                changed
            }
            CommittedDomain::Tree { tree, .. } => tree.clear_selection(),
        }
    }

    pub fn items(&self) -> &[ValueItem] {
        match self {
            CommittedDomain::Flat { items, .. } => items,
            _ => &[],
        }
    }

    pub fn tree(&self) -> Option<&Tree> {
        match self {
            CommittedDomain::Tree { tree, .. } => Some(tree),
            _ => None,
        }
    }

    /// Source of the column a node at `level` came from.
    pub fn level_source(&self, level: i32) -> Option<&ColumnSource> {
        match self {
            CommittedDomain::Tree { sources, .. } => usize::try_from(level)
                .ok()
                .and_then(|l| sources.get(l)),
            CommittedDomain::Flat { source, .. } if level == 0 => Some(source),
            _ => None,
        }
    }

    /// Selected labels in display order, flat items or tree nodes.
    pub fn selected_labels(&self) -> Vec<String> {
        match self {
            CommittedDomain::Empty => Vec::new(),
            CommittedDomain::Flat { items, .. } => items::selected_labels(items),
            CommittedDomain::Tree { tree, .. } => tree
                .selected_nodes()
                .into_iter()
                .map(|id| tree.node(id).label.clone())
                .collect(),
        }
    }

    pub(crate) fn tree_mut(&mut self) -> Option<(&mut Tree, &[ColumnSource])> {
        match self {
            CommittedDomain::Tree { tree, sources } => Some((tree, sources.as_slice())),
            _ => None,
        }
    }

    /// Valid, non-root node of the committed tree.
    pub(crate) fn contains_node(&self, id: NodeId) -> bool {
        self.tree()
            .is_some_and(|t| id != t.root() && t.get(id).is_some())
    }
}
