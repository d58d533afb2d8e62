//! huff-codec: lossless Huffman compression for byte streams.
//!
//! A compressed stream is laid out as:
//! - a 32-bit magic number
//! - the prefix tree's shape, written pre-order
//! - each input byte's code, closed by the end-of-stream code
//!
//! Compression makes two passes over its input: one to count byte
//! frequencies and one to emit codes. Inputs that cannot be rewound go
//! through [`Compressor::compress_bytes`], which buffers them in memory.

pub mod bitio;
pub mod codes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod stream;
pub mod tree;

use crate::bitio::{BitSink, BitSource, BitStreamReader, BitStreamWriter};
use crate::codes::CodeTable;
use crate::config::CodecConfig;
use crate::error::CompressError;
use crate::tree::PrefixTree;
use std::io::Cursor;

/// A byte value (0..=255) or [`PSEUDO_EOF`].
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;
pub const ALPHABET_SIZE: usize = 1 << BITS_PER_WORD;
/// In-band end-of-stream marker, one past the last byte value.
pub const PSEUDO_EOF: Symbol = ALPHABET_SIZE as Symbol;

/// Statistics about one compression run
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionSummary {
    pub original_size: u64,
    pub compressed_size: u64,
    pub distinct_symbols: usize,
    pub header_bits: u64,
    pub payload_bits: u64,
    pub max_code_len: usize,
    pub entropy_bits: f64,
    pub ratio: f64,
}

/// In-memory compressed output
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub data: Vec<u8>,
    pub summary: CompressionSummary,
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress everything in `input` into `out`.
    ///
    /// `input` is rewound to its start, read to its end, rewound, and read again.
    pub fn compress<R: BitSource, W: BitSink>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<CompressionSummary, CompressError> {
        input.rewind()?;
        let freq = frequency::count_symbols(input)?;
        let tree = PrefixTree::from_frequencies(&freq);
        let codes = CodeTable::from_tree(&tree);

        let header_bits = header::write_header(Some(&tree), out)?;
        debug_assert_eq!(header_bits, header::header_bits(&tree));
        input.rewind()?;
        let payload_bits = stream::encode(&codes, input, out)?;
        out.finish()?;

        let original_size = freq.total();
        let compressed_size = (header_bits + payload_bits + 7) / 8;
        let ratio = if original_size == 0 {
            1.0
        } else {
            compressed_size as f64 / original_size as f64
        };
        tracing::debug!(
            original_size,
            compressed_size,
            header_bits,
            payload_bits,
            "compressed stream"
        );

        Ok(CompressionSummary {
            original_size,
            compressed_size,
            distinct_symbols: freq.distinct(),
            header_bits,
            payload_bits,
            max_code_len: codes.max_len(),
            entropy_bits: freq.entropy_bits(),
            ratio,
        })
    }

    /// Decompress a stream produced by [`Compressor::compress`] into `out`.
    ///
    /// Returns the number of bytes written. On error, whatever was already
    /// written to `out` is incomplete and should be discarded.
    pub fn decompress<R: BitSource, W: BitSink>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<u64, CompressError> {
        let tree = header::read_header(input, self.config.accept_legacy_magic)?;
        let written = stream::decode(&tree, input, out)?;
        out.finish()?;
        tracing::debug!(bytes = written, "decompressed stream");
        Ok(written)
    }

    /// Compress a buffer held in memory.
    pub fn compress_bytes(&self, data: &[u8]) -> Result<CompressedOutput, CompressError> {
        if data.len() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: data.len(),
                limit: self.config.max_input_size,
            });
        }
        let mut input = BitStreamReader::new(Cursor::new(data));
        let mut out = BitStreamWriter::new(Vec::new());
        let summary = self.compress(&mut input, &mut out)?;
        Ok(CompressedOutput {
            data: out.into_inner()?,
            summary,
        })
    }

    /// Decompress a buffer held in memory.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        let mut input = BitStreamReader::new(Cursor::new(data));
        let mut out = BitStreamWriter::new(Vec::new());
        self.decompress(&mut input, &mut out)?;
        out.into_inner()
    }
}

/// Compress with the default configuration
pub fn compress<R: BitSource, W: BitSink>(
    input: &mut R,
    out: &mut W,
) -> Result<CompressionSummary, CompressError> {
    Compressor::default().compress(input, out)
}

/// Decompress with the default configuration
pub fn decompress<R: BitSource, W: BitSink>(
    input: &mut R,
    out: &mut W,
) -> Result<u64, CompressError> {
    Compressor::default().decompress(input, out)
}
