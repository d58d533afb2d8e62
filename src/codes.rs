//! Code table derivation from a prefix tree

use crate::tree::{Node, PrefixTree};
use crate::{Symbol, ALPHABET_SIZE};

/// A variable-length code, first bit first. `false` is a left edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn starts_with(&self, other: &Code) -> bool {
        self.bits.starts_with(&other.bits)
    }

    /// Split the code into `(bit_count, value)` words of at most 32 bits,
    /// each ready for a single MSB-first write.
    pub fn words(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.bits.chunks(32).map(|chunk| {
            let value = chunk
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | bit as u32);
            (chunk.len() as u32, value)
        })
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from every leaf symbol of a tree to its code.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE + 1];
        let mut prefix = Vec::new();
        build_codes(tree.root(), &mut prefix, &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Symbols with a code, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }
}

fn build_codes(node: &Node, prefix: &mut Vec<bool>, codes: &mut [Option<Code>]) {
    match node {
        Node::Leaf { symbol, .. } => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(Code {
                    bits: prefix.clone(),
                });
            }
        }
        Node::Internal { left, right, .. } => {
            prefix.push(false);
            build_codes(left, prefix, codes);
            prefix.pop();
            prefix.push(true);
            build_codes(right, prefix, codes);
            prefix.pop();
        }
    }
}
