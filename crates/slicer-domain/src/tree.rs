//! Hierarchical domain builder.
//!
//! Folds N parallel per-level label sequences into a rooted, leveled tree.
//!
//! # Invariants
//!
//! - The synthetic root sits at level `-1` and is never rendered.
//! - Children of a node have pairwise-distinct keys (key == label at that level).
//! - A node is a leaf iff its level equals the last populated level.
//! - Ownership runs parent → children only. `parent` is an arena index used for
//!   path reconstruction, never for lifetime.
//!
//! All traversals are iterative with an explicit stack.

use std::collections::{BTreeSet, HashMap};

use crate::adapter::LevelCandidate;

/// Index of a node inside its [`Tree`] arena. Only valid for the tree that
/// produced it; a rebuild invalidates every id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub key: String,
    pub label: String,
    /// `-1` for the synthetic root, `0..` for hierarchy levels.
    pub level: i32,
    pub expanded: bool,
    pub selected: bool,
    pub is_leaf: bool,
    children: Vec<NodeId>,
    /// Back reference: lookup only.
    parent: Option<NodeId>,
}

impl Node {
    fn new(label: String, level: i32, is_leaf: bool, parent: Option<NodeId>) -> Self {
        Self {
            key: label.clone(),
            label,
            level,
            expanded: false,
            selected: false,
            is_leaf,
            children: Vec::new(),
            parent,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena-backed hierarchy. Node 0 is the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    last_level: i32,
}

impl Default for Tree {
    fn default() -> Self {
        Self::empty()
    }
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    /// Tree holding only the synthetic root.
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::new(String::new(), -1, false, None)],
            last_level: -1,
        }
    }

    /// Build from parallel per-level label sequences (outermost level first).
    ///
    /// Rows are walked in order; duplicate label paths collapse into one node,
    /// so document order is first-appearance order.
    pub fn build(levels: &[Vec<String>]) -> Self {
        let mut tree = Self::empty();
        let depth = levels.len();
        if depth == 0 {
            return tree;
        }
        tree.last_level = depth as i32 - 1;

        let rows = levels[0].len();
        let mut index: HashMap<(NodeId, String), NodeId> = HashMap::new();

        for row in 0..rows {
            let mut cur = Self::ROOT;
            for (lvl, labels) in levels.iter().enumerate() {
                let Some(label) = labels.get(row) else {
                    break;
                };
                let slot = (cur, label.clone());
                cur = match index.get(&slot) {
                    Some(id) => *id,
                    None => {
                        let id = NodeId(tree.nodes.len());
                        let is_leaf = lvl as i32 == tree.last_level;
                        tree.nodes
                            .push(Node::new(label.clone(), lvl as i32, is_leaf, Some(cur)));
                        tree.nodes[cur.0].children.push(id);
                        index.insert(slot, id);
                        id
                    }
                };
            }
        }
        tree
    }

    /// Build from an adapter candidate.
    pub fn from_candidate(candidate: &LevelCandidate) -> Self {
        let levels: Vec<Vec<String>> = candidate.levels.iter().map(|l| l.labels.clone()).collect();
        Self::build(&levels)
    }

    /// Copy selection and expand state forward from `previous` by label path.
    ///
    /// Paths that no longer exist are dropped silently.
    pub fn restore_from(&mut self, previous: &Tree) {
        for path in previous.selected_paths() {
            if let Some(id) = self.find_path(&path) {
                self.nodes[id.0].selected = true;
            }
        }
        for path in previous.collect_paths(|n| n.expanded) {
            if let Some(id) = self.find_path(&path) {
                self.nodes[id.0].expanded = true;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of real nodes (root excluded).
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Number of populated levels.
    pub fn depth(&self) -> usize {
        (self.last_level + 1) as usize
    }

    pub fn last_level(&self) -> i32 {
        self.last_level
    }

    /// Distinct full label paths.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf).count()
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Every real node in document (depth-first, first-appearance) order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.nodes[0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Nodes visible with the current expand state, in document order.
    pub fn visible(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let n = &self.nodes[id.0];
            if n.expanded {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Label paths of every node matching `pred`, in document order.
    pub fn collect_paths(&self, pred: impl Fn(&Node) -> bool) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = self.nodes[0]
            .children
            .iter()
            .rev()
            .map(|id| (*id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let n = &self.nodes[id.0];
            path.truncate(depth);
            path.push(n.label.clone());
            if pred(n) {
                out.push(path.clone());
            }
            stack.extend(n.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }

    pub fn selected_paths(&self) -> Vec<Vec<String>> {
        self.collect_paths(|n| n.selected)
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.nodes[id.0].selected)
            .collect()
    }

    /// Levels currently carrying at least one selected node.
    pub fn selected_levels(&self) -> BTreeSet<i32> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.level)
            .collect()
    }

    pub fn any_selected(&self) -> bool {
        self.nodes.iter().any(|n| n.selected)
    }

    /// First leaf in document order.
    pub fn first_leaf(&self) -> Option<NodeId> {
        let mut cur = Self::ROOT;
        loop {
            let n = &self.nodes[cur.0];
            if n.is_leaf {
                return Some(cur);
            }
            cur = *n.children.first()?;
        }
    }

    /// Resolve a label path (outermost first) to a node.
    pub fn find_path(&self, path: &[String]) -> Option<NodeId> {
        if path.is_empty() {
            return None;
        }
        let mut cur = Self::ROOT;
        for key in path {
            cur = *self.nodes[cur.0]
                .children
                .iter()
                .find(|c| &self.nodes[c.0].key == key)?;
        }
        Some(cur)
    }

    /// Label path from level 0 down to `id`.
    pub fn path_of(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let n = &self.nodes[c.0];
            if n.level < 0 {
                break;
            }
            path.push(n.label.clone());
            cur = n.parent;
        }
        path.reverse();
        path
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    pub fn set_selected(&mut self, id: NodeId, selected: bool) {
        if id != Self::ROOT {
            self.nodes[id.0].selected = selected;
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        let mut changed = false;
        for n in self.nodes.iter_mut() {
            if n.selected {
                n.selected = false;
                changed = true;
            }
        }
        changed
    }

    /// Deselect every node outside `level`.
    pub fn clear_levels_except(&mut self, level: i32) {
        for n in self.nodes.iter_mut() {
            if n.level != level {
                n.selected = false;
            }
        }
    }

    pub fn toggle_expanded(&mut self, id: NodeId) {
        if id != Self::ROOT && !self.nodes[id.0].is_leaf {
            let n = &mut self.nodes[id.0];
            n.expanded = !n.expanded;
        }
    }

    /// Expand every ancestor of `id` so it becomes visible.
    pub fn expand_ancestors(&mut self, id: NodeId) {
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            if p == Self::ROOT {
                break;
            }
            self.nodes[p.0].expanded = true;
            cur = self.nodes[p.0].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    fn sample() -> Tree {
        Tree::build(&[
            s(&["S", "S", "N", "S"]),
            s(&["RS", "SC", "PA", "RS"]),
            s(&["POA", "FLN", "BEL", "CXS"]),
        ])
    }

    #[test]
    fn build_dedupes_by_path_and_marks_leaves() {
        let t = sample();
        assert_eq!(t.depth(), 3);
        // S, RS, POA, CXS, SC, FLN, N, PA, BEL
        assert_eq!(t.len(), 9);
        assert_eq!(t.leaf_count(), 4);

        let rs = t.find_path(&s(&["S", "RS"])).unwrap();
        assert_eq!(t.node(rs).children().len(), 2);
        assert!(!t.node(rs).is_leaf);

        let poa = t.find_path(&s(&["S", "RS", "POA"])).unwrap();
        assert!(t.node(poa).is_leaf);
        assert_eq!(t.node(poa).level, 2);
        assert_eq!(t.node(poa).key, "POA");
    }

    #[test]
    fn preorder_is_first_appearance_order() {
        let t = sample();
        let labels: Vec<&str> = t.preorder().iter().map(|id| t.node(*id).label.as_str()).collect();
        assert_eq!(labels, vec!["S", "RS", "POA", "CXS", "SC", "FLN", "N", "PA", "BEL"]);
    }

    #[test]
    fn same_label_under_different_parents_is_distinct() {
        let t = Tree::build(&[s(&["A", "B"]), s(&["X", "X"])]);
        assert_eq!(t.leaf_count(), 2);
        assert!(t.find_path(&s(&["A", "X"])).is_some());
        assert!(t.find_path(&s(&["B", "X"])).is_some());
    }

    #[test]
    fn path_of_walks_parent_links() {
        let t = sample();
        let bel = t.find_path(&s(&["N", "PA", "BEL"])).unwrap();
        assert_eq!(t.path_of(bel), s(&["N", "PA", "BEL"]));
    }

    #[test]
    fn first_leaf_follows_first_children() {
        let t = sample();
        let leaf = t.first_leaf().unwrap();
        assert_eq!(t.path_of(leaf), s(&["S", "RS", "POA"]));
        assert!(Tree::empty().first_leaf().is_none());
    }

    #[test]
    fn expand_ancestors_opens_the_chain() {
        let mut t = sample();
        let leaf = t.first_leaf().unwrap();
        t.expand_ancestors(leaf);
        assert!(t.node(t.find_path(&s(&["S"])).unwrap()).expanded);
        assert!(t.node(t.find_path(&s(&["S", "RS"])).unwrap()).expanded);
        assert!(!t.node(t.find_path(&s(&["N"])).unwrap()).expanded);
        let visible: Vec<&str> = t.visible().iter().map(|id| t.node(*id).label.as_str()).collect();
        assert_eq!(visible, vec!["S", "RS", "POA", "CXS", "SC", "N"]);
    }

    #[test]
    fn selected_paths_use_growable_path() {
        let mut t = sample();
        let fln = t.find_path(&s(&["S", "SC", "FLN"])).unwrap();
        let bel = t.find_path(&s(&["N", "PA", "BEL"])).unwrap();
        t.set_selected(fln, true);
        t.set_selected(bel, true);
        assert_eq!(
            t.selected_paths(),
            vec![s(&["S", "SC", "FLN"]), s(&["N", "PA", "BEL"])]
        );
        assert_eq!(t.selected_levels().into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn restore_copies_selection_by_path() {
        let mut old = Tree::build(&[s(&["A", "A"]), s(&["B", "C"])]);
        let ab = old.find_path(&s(&["A", "B"])).unwrap();
        old.set_selected(ab, true);
        let a = old.find_path(&s(&["A"])).unwrap();
        old.toggle_expanded(a);

        let mut kept = Tree::build(&[s(&["Z", "A"]), s(&["Q", "B"])]);
        kept.restore_from(&old);
        let ab2 = kept.find_path(&s(&["A", "B"])).unwrap();
        assert!(kept.node(ab2).selected);
        assert!(kept.node(kept.find_path(&s(&["A"])).unwrap()).expanded);

        let mut gone = Tree::build(&[s(&["A"]), s(&["C"])]);
        gone.restore_from(&old);
        assert!(!gone.any_selected());
    }

    #[test]
    fn clear_levels_except_keeps_one_level() {
        let mut t = sample();
        let s_node = t.find_path(&s(&["S"])).unwrap();
        let poa = t.find_path(&s(&["S", "RS", "POA"])).unwrap();
        t.set_selected(s_node, true);
        t.set_selected(poa, true);
        t.clear_levels_except(2);
        assert!(!t.node(s_node).selected);
        assert!(t.node(poa).selected);
    }

    #[test]
    fn leaves_do_not_toggle_expansion() {
        let mut t = sample();
        let poa = t.find_path(&s(&["S", "RS", "POA"])).unwrap();
        t.toggle_expanded(poa);
        assert!(!t.node(poa).expanded);
    }
}
