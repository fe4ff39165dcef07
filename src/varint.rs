//! Base-128 varints and zigzag mapping.
//!
//! Each byte stores 7 payload bits, least significant group first; the high bit
//! is set on every byte except the last.

use crate::constants::MAX_VARINT_LEN;
use crate::error::DecodeError;

/// Map a signed value to unsigned so small magnitudes of either sign stay small
#[inline]
#[must_use]
pub const fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// Inverse of [`zigzag_encode`]
#[inline]
#[must_use]
pub const fn zigzag_decode(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Append `v` as an unsigned varint
#[inline]
pub fn write_uvarint(mut v: u64, out: &mut Vec<u8>) {
    while v >= 0x80 {
        out.push((v as u8) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Append `v` as a zigzag varint
#[inline]
pub fn write_varint(v: i64, out: &mut Vec<u8>) {
    write_uvarint(zigzag_encode(v), out);
}

/// Read an unsigned varint starting at `*offset`, advancing the offset past it
///
/// # Errors
/// - [`DecodeError::TruncatedInput`] if the buffer ends before the final byte
/// - [`DecodeError::MalformedPayload`] if the varint does not fit in 64 bits
pub fn read_uvarint(buf: &[u8], offset: &mut usize) -> Result<u64, DecodeError> {
    let mut result = 0u64;
    let mut shift = 0u32;
    let mut pos = *offset;

    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(pos) else {
            return Err(DecodeError::TruncatedInput { expected: pos + 1, actual: buf.len() });
        };
        pos += 1;

        // The tenth byte may only contribute the single remaining bit
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(DecodeError::MalformedPayload);
        }

        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            *offset = pos;
            return Ok(result);
        }
        shift += 7;
    }

    Err(DecodeError::MalformedPayload)
}

/// Read a zigzag varint starting at `*offset`
///
/// # Errors
/// Same as [`read_uvarint`].
#[inline]
pub fn read_varint(buf: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    read_uvarint(buf, offset).map(zigzag_decode)
}
