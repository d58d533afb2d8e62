//! Symbol frequency counting

use crate::bitio::BitSource;
use crate::error::CompressError;
use crate::BITS_PER_WORD;

/// Occurrence counts for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl FrequencyTable {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &b in data {
            table.counts[b as usize] += 1;
        }
        table
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Byte values that occurred at least once, with their counts, in ascending byte order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    pub fn distinct(&self) -> usize {
        self.present().count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Shannon entropy of the counted data in bits per byte.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for (_, f) in self.present() {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

/// Consume `source` to its end, counting each 8-bit symbol.
pub fn count_symbols<S: BitSource>(source: &mut S) -> Result<FrequencyTable, CompressError> {
    let mut table = FrequencyTable::default();
    while let Some(value) = source.read_bits(BITS_PER_WORD)? {
        table.counts[value as usize] += 1;
    }
    tracing::trace!(
        total = table.total(),
        distinct = table.distinct(),
        "counted input symbols"
    );
    Ok(table)
}
