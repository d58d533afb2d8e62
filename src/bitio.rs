//! Bit-granular I/O used by the codec.
//!
//! The codec only ever talks to a [`BitSource`] and a [`BitSink`]. The
//! adapters here put those traits on top of `bitstream-io`, packing bits
//! most significant first.

use crate::error::CompressError;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A readable bit stream that can be restarted from its first bit.
pub trait BitSource {
    /// Read `n` (1..=32) bits as an unsigned value.
    ///
    /// Returns `Ok(None)` once the stream holds no more data.
    fn read_bits(&mut self, n: u32) -> Result<Option<u32>, CompressError>;

    /// Reposition at the very first bit of the stream.
    fn rewind(&mut self) -> Result<(), CompressError>;

    fn read_bit(&mut self) -> Result<Option<bool>, CompressError> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }
}

/// A writable bit stream.
pub trait BitSink {
    /// Write the low `n` (1..=32) bits of `value`, most significant first.
    fn write_bits(&mut self, n: u32, value: u32) -> Result<(), CompressError>;

    /// Zero-pad to the next byte boundary and flush.
    fn finish(&mut self) -> Result<(), CompressError>;
}

/// [`BitSource`] over any seekable byte reader.
pub struct BitStreamReader<R: Read + Seek> {
    bits: BitReader<R, BigEndian>,
}

impl<R: Read + Seek> BitStreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bits: BitReader::endian(reader, BigEndian),
        }
    }

    pub fn into_inner(self) -> R {
        self.bits.into_reader()
    }
}

impl<R: Read + Seek> BitSource for BitStreamReader<R> {
    fn read_bits(&mut self, n: u32) -> Result<Option<u32>, CompressError> {
        debug_assert!((1..=32).contains(&n));
        match self.bits.read::<u32>(n) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_bit(&mut self) -> Result<Option<bool>, CompressError> {
        match self.bits.read_bit() {
            Ok(bit) => Ok(Some(bit)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn rewind(&mut self) -> Result<(), CompressError> {
        // drop any buffered partial byte so the inner reader is reachable
        self.bits.byte_align();
        let inner = self.bits.reader().ok_or_else(|| {
            CompressError::IoError(io::Error::new(
                io::ErrorKind::Other,
                "bit reader not byte-aligned after alignment",
            ))
        })?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// [`BitSink`] over any byte writer.
pub struct BitStreamWriter<W: Write> {
    bits: BitWriter<W, BigEndian>,
}

impl<W: Write> BitStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            bits: BitWriter::endian(writer, BigEndian),
        }
    }

    /// Pad the final byte and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, CompressError> {
        self.bits.byte_align()?;
        Ok(self.bits.into_writer())
    }
}

impl<W: Write> BitSink for BitStreamWriter<W> {
    fn write_bits(&mut self, n: u32, value: u32) -> Result<(), CompressError> {
        debug_assert!((1..=32).contains(&n));
        let masked = if n == 32 { value } else { value & ((1u32 << n) - 1) };
        self.bits.write(n, masked)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CompressError> {
        self.bits.byte_align()?;
        if let Some(inner) = self.bits.writer() {
            inner.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_msb_first() {
        let mut source = BitStreamReader::new(Cursor::new(vec![0b1010_0000u8, 0xFF]));
        assert_eq!(source.read_bit().unwrap(), Some(true));
        assert_eq!(source.read_bit().unwrap(), Some(false));
        assert_eq!(source.read_bits(3).unwrap(), Some(0b100));
        assert_eq!(source.read_bits(11).unwrap(), Some(0b000_1111_1111));
    }

    #[test]
    fn test_read_end_of_input() {
        let mut source = BitStreamReader::new(Cursor::new(vec![7u8]));
        assert_eq!(source.read_bits(8).unwrap(), Some(7));
        assert_eq!(source.read_bits(8).unwrap(), None);
        assert_eq!(source.read_bit().unwrap(), None);
    }

    #[test]
    fn test_rewind_restarts_stream() {
        let mut source = BitStreamReader::new(Cursor::new(vec![0xAB, 0xCD]));
        assert_eq!(source.read_bits(8).unwrap(), Some(0xAB));
        assert_eq!(source.read_bits(3).unwrap(), Some(0b110));
        source.rewind().unwrap();
        assert_eq!(source.read_bits(16).unwrap(), Some(0xABCD));
    }

    #[test]
    fn test_write_pads_final_byte() {
        let mut sink = BitStreamWriter::new(Vec::new());
        sink.write_bits(1, 1).unwrap();
        sink.write_bits(9, 0x100).unwrap();
        sink.write_bits(32, 0xDEAD_BEEF).unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(bytes, vec![0xC0, 0x37, 0xAB, 0x6F, 0xBB, 0xC0]);
    }

    #[test]
    fn test_write_masks_high_bits() {
        let mut sink = BitStreamWriter::new(Vec::new());
        sink.write_bits(4, 0xFA).unwrap();
        sink.write_bits(4, 0x05).unwrap();
        assert_eq!(sink.into_inner().unwrap(), vec![0xA5]);
    }
}
