#![doc = r#"
Variable-length quantities

Delta-times and the lengths of meta and system exclusive events are stored 7 bits
per byte, most significant group first. Every byte but the last has its top bit set,
so `0..=127` takes a single byte.

The largest value allowed is [`VLQ_MAX`] (`0x0FFFFFFF`), which keeps every quantity
within 4 bytes. Length, encoding and decoding all enforce that bound.
"#]

use crate::{VlqError, reader::Reader, reader::ReadResult, writer::Sink};
use alloc::vec::Vec;

/// The largest value a variable-length quantity can hold.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Number of bytes needed to encode `value`.
pub fn vlq_len(value: u32) -> Result<usize, VlqError> {
    if value > VLQ_MAX {
        return Err(VlqError::TooLarge(value));
    }
    let bits = (u32::BITS - value.leading_zeros()) as usize;
    Ok(bits.div_ceil(7).max(1))
}

/// Writes `value` and returns the number of bytes written.
pub(crate) fn write_vlq<S: Sink>(value: u32, out: &mut S) -> Result<usize, VlqError> {
    let len = vlq_len(value)?;
    let mut buf = [0u8; 4];
    for (i, byte) in buf[..len].iter_mut().enumerate() {
        let shift = 7 * (len - 1 - i);
        *byte = ((value >> shift) & 0x7F) as u8;
        if i + 1 < len {
            *byte |= 0x80;
        }
    }
    out.put(&buf[..len]);
    Ok(len)
}

/// Encodes `value` into a fresh buffer.
pub fn vlq_bytes(value: u32) -> Result<Vec<u8>, VlqError> {
    let mut out = Vec::with_capacity(4);
    write_vlq(value, &mut out)?;
    Ok(out)
}

/// Decodes a quantity from the start of `bytes`, returning it with the number of bytes
/// it took.
pub fn read_vlq(bytes: &[u8]) -> ReadResult<(u32, usize)> {
    Reader::from_byte_slice(bytes).read_vlq()
}

#[test]
fn lengths() {
    assert_eq!(vlq_len(0), Ok(1));
    assert_eq!(vlq_len(0x7F), Ok(1));
    assert_eq!(vlq_len(0x80), Ok(2));
    assert_eq!(vlq_len(0x3FFF), Ok(2));
    assert_eq!(vlq_len(0x4000), Ok(3));
    assert_eq!(vlq_len(0x1F_FFFF), Ok(3));
    assert_eq!(vlq_len(0x20_0000), Ok(4));
    assert_eq!(vlq_len(VLQ_MAX), Ok(4));
    assert_eq!(vlq_len(VLQ_MAX + 1), Err(VlqError::TooLarge(0x1000_0000)));
}

#[test]
fn known_encodings() {
    use pretty_assertions::assert_eq;
    // values from the SMF 1.0 specification
    let table: [(u32, &[u8]); 10] = [
        (0x00, &[0x00]),
        (0x40, &[0x40]),
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x4000, &[0x81, 0x80, 0x00]),
        (0x10_0000, &[0xC0, 0x80, 0x00]),
        (0x20_0000, &[0x81, 0x80, 0x80, 0x00]),
        (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in table {
        assert_eq!(vlq_bytes(value).unwrap(), bytes);
        assert_eq!(read_vlq(bytes).unwrap(), (value, bytes.len()));
    }
}

#[test]
fn round_trip_across_range() {
    let mut value = 0u32;
    while value <= VLQ_MAX {
        let bytes = vlq_bytes(value).unwrap();
        assert_eq!(bytes.len(), vlq_len(value).unwrap());
        assert_eq!(read_vlq(&bytes).unwrap(), (value, bytes.len()));
        value = value * 3 + 1;
    }
}

#[test]
fn decode_failures() {
    let overflow = read_vlq(&[0x81, 0x80, 0x80, 0x80, 0x00]).unwrap_err();
    assert!(matches!(
        overflow.error_kind(),
        crate::reader::ReaderErrorKind::ParseError(crate::ParseError::Vlq(VlqError::Overflow))
    ));

    let truncated = read_vlq(&[0x81, 0x80]).unwrap_err();
    assert!(truncated.is_out_of_bounds());

    assert!(vlq_bytes(0x1000_0000).is_err());
}
