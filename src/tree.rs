//! Huffman prefix tree construction
//!
//! Leaves carry symbols, internal nodes always own exactly two children.
//! Equal weights are ordered by creation sequence so that identical input
//! always yields an identical tree.

use crate::frequency::FrequencyTable;
use crate::{Symbol, PSEUDO_EOF};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: Symbol, weight: u64 },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn join(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A complete prefix tree, owned by a single compression or decompression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTree {
    root: Node,
}

impl PrefixTree {
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    /// Build the minimum-weight tree over every present byte plus the
    /// end-of-stream symbol, which always gets weight 1.
    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;
        let mut push = |heap: &mut BinaryHeap<Pending>, node: Node| {
            heap.push(Pending { seq, node });
            seq += 1;
        };

        for (byte, count) in freq.present() {
            push(&mut heap, Node::leaf(byte as Symbol, count));
        }
        push(&mut heap, Node::leaf(PSEUDO_EOF, 1));

        loop {
            let first = match heap.pop() {
                Some(p) => p.node,
                None => unreachable!("end-of-stream leaf is always queued"),
            };
            let second = match heap.pop() {
                Some(p) => p.node,
                None => {
                    let tree = Self { root: first };
                    tracing::debug!(
                        leaves = tree.leaf_count(),
                        depth = tree.depth(),
                        weight = tree.weight(),
                        "built prefix tree"
                    );
                    return tree;
                }
            };
            push(&mut heap, Node::join(first, second));
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

/// Queue entry ordered as a min-heap on `(weight, seq)`.
struct Pending {
    seq: u64,
    node: Node,
}

impl Pending {
    fn key(&self) -> (u64, u64) {
        (self.node.weight(), self.seq)
    }
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key()) // min-heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_tree() {
        let tree = PrefixTree::from_frequencies(&FrequencyTable::default());
        assert_eq!(tree.root(), &Node::leaf(PSEUDO_EOF, 1));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_single_symbol_tree() {
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(b"aaaa"));
        // eof (weight 1) is lighter than 'a' (weight 4), so it is removed first
        let expected = Node::join(Node::leaf(PSEUDO_EOF, 1), Node::leaf(b'a' as Symbol, 4));
        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.weight(), 5);
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        // 'a', 'b' and eof all weigh 1: 'a' and 'b' combine first, then eof
        // (older) is taken before the new internal node
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(b"ba"));
        let expected = Node::join(
            Node::leaf(PSEUDO_EOF, 1),
            Node::join(Node::leaf(b'a' as Symbol, 1), Node::leaf(b'b' as Symbol, 1)),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_tree_weight_is_input_plus_eof() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(data));
        assert_eq!(tree.weight(), data.len() as u64 + 1);
        assert_eq!(tree.leaf_count(), FrequencyTable::from_bytes(data).distinct() + 1);
    }

    #[test]
    fn test_deterministic_construction() {
        let freq = FrequencyTable::from_bytes(b"mississippi river banks");
        assert_eq!(
            PrefixTree::from_frequencies(&freq),
            PrefixTree::from_frequencies(&freq)
        );
    }

    #[test]
    fn test_all_bytes_balanced() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(&data));
        assert_eq!(tree.leaf_count(), 257);
        assert!(tree.depth() <= 9);
    }
}
