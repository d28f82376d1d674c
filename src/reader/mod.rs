#![doc = r#"
Contains the [`Reader`] used to decode MIDI files, and the [`ReadingSettings`] that
decide how tolerant decoding is.

# Overview

A [`Reader`] is a cursor over a borrowed byte slice. Every length found in a file is
treated as an untrusted upper bound: chunk and event content is decoded through a
[`Reader::sub_reader`] that cannot see past the declared end, and any read beyond the
available bytes is an [`OutOfBounds`](ReaderErrorKind::OutOfBounds) error.

Positions reported in errors are always absolute offsets from the start of the file,
sub-readers included.
"#]

mod error;
pub use error::*;

mod settings;
pub use settings::*;

use crate::{VlqError, vlq::VLQ_MAX};

/// A bounded cursor over MIDI bytes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over a byte slice
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            base: 0,
        }
    }

    /// Absolute position of the next byte to be read.
    pub const fn position(&self) -> usize {
        self.base + self.position
    }

    /// Number of bytes left.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True if every byte has been read.
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8().ok_or(ReaderError::oob(self.position()))?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads exactly `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(ReaderError::oob(self.position()));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Reads everything that is left.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        self.position = self.data.len();
        rest
    }

    /// Splits off a reader over the next `len` bytes and moves past them.
    ///
    /// Positions reported by the sub-reader stay absolute.
    pub fn sub_reader(&mut self, len: usize) -> ReadResult<Reader<'a>> {
        let base = self.position();
        let data = self.read_slice(len)?;
        Ok(Reader {
            data,
            position: 0,
            base,
        })
    }

    /// Reads a variable-length quantity, returning it with the number of bytes it took.
    ///
    /// Fails with [`VlqError::Overflow`] if the quantity runs over 4 bytes.
    pub fn read_vlq(&mut self) -> ReadResult<(u32, usize)> {
        let start = self.position();
        let mut value: u32 = 0;
        for len in 1..=4 {
            let byte = self.read_u8()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                debug_assert!(value <= VLQ_MAX);
                return Ok((value, len));
            }
        }
        Err(ReaderError::parse_error(start, VlqError::Overflow.into()))
    }
}

#[test]
fn sub_reader_is_bounded() {
    let bytes = [1, 2, 3, 4, 5];
    let mut reader = Reader::from_byte_slice(&bytes);
    reader.read_u8().unwrap();
    let mut sub = reader.sub_reader(2).unwrap();
    assert_eq!(reader.position(), 3);

    assert_eq!(sub.position(), 1);
    assert_eq!(sub.read_array::<2>().unwrap(), [2, 3]);
    let err = sub.read_u8().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 3);

    assert_eq!(reader.take_rest(), &[4, 5]);
    assert!(reader.is_empty());
}

#[test]
fn oversized_sub_reader() {
    let bytes = [0u8; 3];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(reader.sub_reader(4).unwrap_err().is_out_of_bounds());
    assert_eq!(reader.remaining(), 3);
}
