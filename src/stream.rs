//! Payload encoding and decoding
//!
//! The payload is the concatenation of each input byte's code, closed by the
//! end-of-stream code. Anything after that code is byte padding and is never
//! read.

use crate::bitio::{BitSink, BitSource};
use crate::codes::{Code, CodeTable};
use crate::error::CompressError;
use crate::tree::{Node, PrefixTree};
use crate::{Symbol, BITS_PER_WORD, PSEUDO_EOF};

/// Re-read `input` from its current position and write each byte's code,
/// then the end-of-stream code. Returns the number of payload bits written.
pub fn encode<R: BitSource, W: BitSink>(
    codes: &CodeTable,
    input: &mut R,
    out: &mut W,
) -> Result<u64, CompressError> {
    let mut written = 0u64;
    let mut symbols = 0u64;
    while let Some(value) = input.read_bits(BITS_PER_WORD)? {
        let code = codes.get(value as Symbol).ok_or_else(|| {
            CompressError::MalformedStream(format!(
                "byte {:#04x} has no code; input changed between passes",
                value
            ))
        })?;
        written += write_code(code, out)?;
        symbols += 1;
    }

    let eof = codes.get(PSEUDO_EOF).ok_or_else(|| {
        CompressError::MalformedStream("code table has no end-of-stream code".into())
    })?;
    written += write_code(eof, out)?;
    tracing::trace!(symbols, bits = written, "encoded payload");
    Ok(written)
}

fn write_code<W: BitSink>(code: &Code, out: &mut W) -> Result<u64, CompressError> {
    for (len, value) in code.words() {
        out.write_bits(len, value)?;
    }
    Ok(code.len() as u64)
}

/// Walk `tree` bit by bit, writing one byte per leaf reached, until the
/// end-of-stream leaf. Returns the number of bytes written.
pub fn decode<R: BitSource, W: BitSink>(
    tree: &PrefixTree,
    input: &mut R,
    out: &mut W,
) -> Result<u64, CompressError> {
    let root = tree.root();
    if let Node::Leaf { symbol, .. } = root {
        // only an empty input produces a single-leaf tree
        return if *symbol == PSEUDO_EOF {
            Ok(0)
        } else {
            Err(CompressError::MalformedStream(
                "tree has no end-of-stream leaf".into(),
            ))
        };
    }

    let mut emitted = 0u64;
    let mut node = root;
    loop {
        let bit = input.read_bit()?.ok_or_else(|| {
            CompressError::MalformedStream(format!(
                "stream ends before end-of-stream code after {} bytes",
                emitted
            ))
        })?;
        let next: &Node = match node {
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            Node::Leaf { .. } => {
                return Err(CompressError::MalformedStream(
                    "decoder stepped past a leaf".into(),
                ))
            }
        };
        match next {
            Node::Leaf { symbol, .. } if *symbol == PSEUDO_EOF => break,
            Node::Leaf { symbol, .. } => {
                out.write_bits(BITS_PER_WORD, *symbol as u32)?;
                emitted += 1;
                node = root;
            }
            Node::Internal { .. } => node = next,
        }
    }

    tracing::trace!(bytes = emitted, "decoded payload");
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{BitStreamReader, BitStreamWriter};
    use crate::frequency::FrequencyTable;
    use std::io::Cursor;

    fn encode_bytes(data: &[u8]) -> (PrefixTree, Vec<u8>, u64) {
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(data));
        let codes = CodeTable::from_tree(&tree);
        let mut input = BitStreamReader::new(Cursor::new(data.to_vec()));
        let mut sink = BitStreamWriter::new(Vec::new());
        let bits = encode(&codes, &mut input, &mut sink).unwrap();
        (tree, sink.into_inner().unwrap(), bits)
    }

    fn decode_bytes(tree: &PrefixTree, payload: Vec<u8>) -> Result<Vec<u8>, CompressError> {
        let mut input = BitStreamReader::new(Cursor::new(payload));
        let mut sink = BitStreamWriter::new(Vec::new());
        decode(tree, &mut input, &mut sink)?;
        sink.into_inner()
    }

    #[test]
    fn test_encode_single_symbol_payload() {
        // eof = "0", 'a' = "1"
        let (_, payload, bits) = encode_bytes(b"aaa");
        assert_eq!(bits, 4);
        assert_eq!(payload, vec![0b1110_0000]);
    }

    #[test]
    fn test_payload_roundtrip() {
        let data = b"streaming decoders stop at the terminator";
        let (tree, payload, _) = encode_bytes(data);
        assert_eq!(decode_bytes(&tree, payload).unwrap(), data);
    }

    #[test]
    fn test_trailing_bits_ignored() {
        let data = b"padding after the end";
        let (tree, mut payload, _) = encode_bytes(data);
        payload.extend_from_slice(&[0xFF, 0x00, 0xAA]);
        assert_eq!(decode_bytes(&tree, payload).unwrap(), data);
    }

    #[test]
    fn test_empty_payload_for_eof_only_tree() {
        let (tree, payload, bits) = encode_bytes(b"");
        assert_eq!(bits, 0);
        assert!(payload.is_empty());
        assert!(decode_bytes(&tree, payload).unwrap().is_empty());
    }

    #[test]
    fn test_missing_terminator() {
        let (tree, mut payload, _) = encode_bytes(b"cut short before the end");
        payload.pop();
        assert!(matches!(
            decode_bytes(&tree, payload),
            Err(CompressError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_leaf_root_without_eof() {
        let tree = PrefixTree::from_root(Node::leaf(b'x' as Symbol, 0));
        assert!(matches!(
            decode_bytes(&tree, vec![0u8; 4]),
            Err(CompressError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_encode_rejects_unknown_byte() {
        let tree = PrefixTree::from_frequencies(&FrequencyTable::from_bytes(b"abc"));
        let codes = CodeTable::from_tree(&tree);
        let mut input = BitStreamReader::new(Cursor::new(b"abd".to_vec()));
        let mut sink = BitStreamWriter::new(Vec::new());
        assert!(matches!(
            encode(&codes, &mut input, &mut sink),
            Err(CompressError::MalformedStream(_))
        ));
    }
}
