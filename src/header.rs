//! Compressed stream header: magic number followed by the tree shape
//!
//! The tree is written pre-order. An internal node is a single `0` bit
//! followed by its left then right subtree; a leaf is a `1` bit followed by
//! its symbol in [`LEAF_BITS`] bits.

use crate::bitio::{BitSink, BitSource};
use crate::error::CompressError;
use crate::tree::{Node, PrefixTree};
use crate::{Symbol, ALPHABET_SIZE, BITS_PER_INT, PSEUDO_EOF};

/// Magic number stamped on every stream this crate writes.
pub const HUFF_NUMBER: u32 = 0xface_8200;
/// Older tree-header magic, still accepted on read.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
/// Width of a leaf's symbol value; one more than a byte to fit end-of-stream.
pub const LEAF_BITS: u32 = 9;

/// Write the magic number and, if present, the tree. Returns the number of bits written.
pub fn write_header<W: BitSink>(
    tree: Option<&PrefixTree>,
    out: &mut W,
) -> Result<u64, CompressError> {
    out.write_bits(BITS_PER_INT, HUFF_NUMBER)?;
    let mut written = BITS_PER_INT as u64;
    if let Some(tree) = tree {
        written += write_node(tree.root(), out)?;
    }
    tracing::trace!(bits = written, "wrote header");
    Ok(written)
}

fn write_node<W: BitSink>(node: &Node, out: &mut W) -> Result<u64, CompressError> {
    match node {
        Node::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(LEAF_BITS, *symbol as u32)?;
            Ok(1 + LEAF_BITS as u64)
        }
        Node::Internal { left, right, .. } => {
            out.write_bits(1, 0)?;
            Ok(1 + write_node(left, out)? + write_node(right, out)?)
        }
    }
}

/// Size in bits of the header [`write_header`] produces for `tree`.
pub fn header_bits(tree: &PrefixTree) -> u64 {
    let leaves = tree.leaf_count() as u64;
    let internals = leaves - 1;
    BITS_PER_INT as u64 + internals + leaves * (1 + LEAF_BITS as u64)
}

/// Validate the magic number and rebuild the tree that follows it.
///
/// Rebuilt nodes carry zero weight; only their shape and symbols matter for decoding.
pub fn read_header<R: BitSource>(
    input: &mut R,
    accept_legacy: bool,
) -> Result<PrefixTree, CompressError> {
    // a stream too short for the magic fails the same check as a wrong one
    let magic = input.read_bits(BITS_PER_INT)?;
    let accepted = match magic {
        Some(HUFF_NUMBER) => true,
        Some(HUFF_TREE) => accept_legacy,
        _ => false,
    };
    if !accepted {
        return Err(CompressError::Format {
            found: magic,
            expected: HUFF_NUMBER,
        });
    }

    let root = read_node(input, 0)?;
    let tree = PrefixTree::from_root(root);
    tracing::trace!(leaves = tree.leaf_count(), "read header");
    Ok(tree)
}

fn read_node<R: BitSource>(input: &mut R, depth: usize) -> Result<Node, CompressError> {
    // a tree over the full alphabet plus end-of-stream is never deeper than this
    if depth > ALPHABET_SIZE {
        return Err(CompressError::MalformedStream(format!(
            "tree header nests deeper than {} levels",
            ALPHABET_SIZE
        )));
    }
    let tag = input
        .read_bit()?
        .ok_or_else(|| CompressError::MalformedStream("truncated tree header".into()))?;
    if tag {
        let value = input
            .read_bits(LEAF_BITS)?
            .ok_or_else(|| CompressError::MalformedStream("truncated tree header".into()))?;
        if value > PSEUDO_EOF as u32 {
            return Err(CompressError::MalformedStream(format!(
                "leaf symbol {} out of range",
                value
            )));
        }
        Ok(Node::leaf(value as Symbol, 0))
    } else {
        let left = read_node(input, depth + 1)?;
        let right = read_node(input, depth + 1)?;
        Ok(Node::join(left, right))
    }
}
