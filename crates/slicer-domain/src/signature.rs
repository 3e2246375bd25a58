//! Content fingerprints used to tell "the data really changed" apart from a
//! same-cardinality redelivery.

use sha2::{Digest, Sha256};

use crate::tree::Tree;

const UNIT_SEP: u8 = 0x1f;

/// Signature of an ordered flat label sequence.
pub fn labels_signature<S: AsRef<str>>(labels: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"flat");
    for l in labels {
        hasher.update([UNIT_SEP]);
        hasher.update(l.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Signature of a tree's `(level, label)` sequence in document order.
pub fn tree_signature(tree: &Tree) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"tree");
    for id in tree.preorder() {
        let n = tree.node(id);
        hasher.update([UNIT_SEP]);
        hasher.update(n.level.to_le_bytes());
        hasher.update(n.label.as_bytes());
    }
    hex::encode(hasher.finalize())
}
