//! slicer-domain
//!
//! Turns host snapshots into the committed domain a slicer renders:
//! - flat mode: an ordered list of [`ValueItem`]s
//! - tree mode: an arena [`Tree`] with path-preserving rebuilds
//!
//! Deterministic, pure logic. No IO. No host calls.

pub mod adapter;
pub mod items;
pub mod search;
pub mod signature;
pub mod tree;

pub use adapter::{
    extract_flat, extract_levels, field_identity, label_of, FlatCandidate, LevelCandidate,
    LevelLabels,
};
pub use items::{build_items, ValueItem};
pub use signature::{labels_signature, tree_signature};
pub use tree::{Node, NodeId, Tree};
