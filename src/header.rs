//! Header byte layout and block inspection.

use std::fmt;

use crate::constants::{
    pow10, HEADER_SIZE, TAG_CONSTANT_DELTA, TAG_PACKED, TAG_RAW, WORD_SIZE,
};
use crate::error::DecodeError;
use crate::packing::Unpacker;
use crate::varint::{read_uvarint, read_varint};

/// Encoding strategy named by the high nibble of the header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Every timestamp stored as a big-endian i64
    Raw,
    /// First value, scaled delta and count of an arithmetic progression
    ConstantDelta,
    /// First value followed by selector-packed zigzag deltas
    Packed,
}

impl Encoding {
    /// Tag nibble written to the header
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Raw => TAG_RAW,
            Self::ConstantDelta => TAG_CONSTANT_DELTA,
            Self::Packed => TAG_PACKED,
        }
    }
}

impl TryFrom<u8> for Encoding {
    type Error = DecodeError;

    fn try_from(tag: u8) -> Result<Self, DecodeError> {
        match tag {
            TAG_RAW => Ok(Self::Raw),
            TAG_CONSTANT_DELTA => Ok(Self::ConstantDelta),
            TAG_PACKED => Ok(Self::Packed),
            _ => Err(DecodeError::UnknownEncodingTag { tag }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::ConstantDelta => "constant-delta",
            Self::Packed => "packed",
        })
    }
}

/// Parsed header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub encoding: Encoding,
    /// Decimal exponent of the divisor; always 0 for raw blocks
    pub exponent: u8,
}

impl Header {
    #[inline]
    pub const fn new(encoding: Encoding, exponent: u8) -> Self {
        Self { encoding, exponent }
    }

    #[inline]
    pub const fn to_byte(self) -> u8 {
        (self.encoding.tag() << 4) | (self.exponent & 0x0F)
    }

    /// Parse the header byte
    ///
    /// The exponent nibble is ignored for raw blocks.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let encoding = Encoding::try_from(byte >> 4)?;
        let exponent = match encoding {
            Encoding::Raw => 0,
            Encoding::ConstantDelta | Encoding::Packed => byte & 0x0F,
        };
        Ok(Self { encoding, exponent })
    }

    #[inline]
    pub const fn divisor(self) -> i64 {
        pow10(self.exponent)
    }
}

/// Summary of an encoded block, read without iterating its timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Strategy the encoder selected
    pub encoding: Encoding,
    /// Decimal exponent of the divisor (0 for raw blocks)
    pub exponent: u8,
    /// Number of timestamps in the block
    pub count: u64,
    /// Total encoded size in bytes, header included
    pub encoded_len: usize,
}

impl BlockInfo {
    /// Divisor applied to the deltas (`10^exponent`)
    #[inline]
    #[must_use]
    pub const fn divisor(&self) -> i64 {
        pow10(self.exponent)
    }
}

/// Read the header and element count of an encoded block
///
/// Returns `Ok(None)` for the empty buffer, which encodes zero timestamps.
///
/// # Errors
/// Returns the same errors [`Decoder::new`](crate::Decoder::new) would.
///
/// # Example
/// ```
/// use tsdelta::{inspect, Encoder, Encoding};
///
/// let mut enc = Encoder::<9>::new();
/// for i in 0..500 {
///     enc.write(i * 1_000_000_000);
/// }
/// let bytes = enc.finalize().unwrap();
///
/// let info = inspect(&bytes).unwrap().unwrap();
/// assert_eq!(info.encoding, Encoding::ConstantDelta);
/// assert_eq!(info.divisor(), 1_000_000_000);
/// assert_eq!(info.count, 500);
/// ```
pub fn inspect(buf: &[u8]) -> Result<Option<BlockInfo>, DecodeError> {
    let Some((&first, payload)) = buf.split_first() else {
        return Ok(None);
    };
    let header = Header::from_byte(first)?;

    let count = match header.encoding {
        Encoding::Raw => {
            check_words(payload)?;
            (payload.len() / WORD_SIZE) as u64
        }
        Encoding::ConstantDelta => {
            let mut offset = WORD_SIZE;
            check_len(payload, offset)?;
            read_varint(payload, &mut offset)?;
            let count = read_uvarint(payload, &mut offset)?;
            if offset != payload.len() {
                return Err(DecodeError::MalformedPayload);
            }
            count
        }
        Encoding::Packed => {
            check_len(payload, WORD_SIZE)?;
            check_words(payload)?;
            let deltas = Unpacker::new(&payload[WORD_SIZE..])?;
            deltas.remaining() as u64 + 1
        }
    };

    Ok(Some(BlockInfo {
        encoding: header.encoding,
        exponent: header.exponent,
        count,
        encoded_len: buf.len(),
    }))
}

/// Fail unless `payload` holds at least `needed` bytes
#[inline]
pub(crate) fn check_len(payload: &[u8], needed: usize) -> Result<(), DecodeError> {
    if payload.len() < needed {
        return Err(DecodeError::TruncatedInput {
            expected: HEADER_SIZE + needed,
            actual: HEADER_SIZE + payload.len(),
        });
    }
    Ok(())
}

/// Fail unless `payload` is a whole number of 8-byte words
#[inline]
pub(crate) fn check_words(payload: &[u8]) -> Result<(), DecodeError> {
    let rem = payload.len() % WORD_SIZE;
    if rem != 0 {
        return Err(DecodeError::TruncatedInput {
            expected: HEADER_SIZE + payload.len() + (WORD_SIZE - rem),
            actual: HEADER_SIZE + payload.len(),
        });
    }
    Ok(())
}
