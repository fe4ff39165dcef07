//! Encoder for tsdelta timestamp compression.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_MAX_EXP, HEADER_SIZE, MAX_HEADER_EXP, WORD_SIZE};
use crate::error::EncodeError;
use crate::header::{Encoding, Header};
use crate::normalize::{normalize, Normalized};
use crate::packing::pack;
use crate::varint::{write_uvarint, write_varint};

/// Encoder for `tsdelta` format
///
/// Accumulates nanosecond timestamps in write order and produces the smallest of
/// the three block layouts when finalized. Timestamps need not be sorted.
///
/// `MAX_EXP` is the highest power-of-ten exponent tried when looking for a common
/// divisor of the deltas (default 9, one second in nanoseconds). It must fit the
/// header nibble (0..=15); larger values fail to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoder<const MAX_EXP: u8 = 9> {
    /// Timestamps in write order
    ts: Vec<i64>,
}

impl<const MAX_EXP: u8> Encoder<MAX_EXP> {
    const VALID_MAX_EXP: () = assert!(MAX_EXP <= MAX_HEADER_EXP, "MAX_EXP must be at most 15");

    /// Create a new encoder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let () = Self::VALID_MAX_EXP;
        Self { ts: Vec::new() }
    }

    /// Create an encoder with room for `capacity` timestamps
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let () = Self::VALID_MAX_EXP;
        Self { ts: Vec::with_capacity(capacity) }
    }

    /// Highest divisor exponent this encoder searches
    #[inline]
    #[must_use]
    pub const fn max_exponent() -> u8 {
        MAX_EXP
    }

    /// Append a timestamp (nanoseconds since the epoch)
    #[inline]
    pub fn write(&mut self, ts: i64) {
        self.ts.push(ts);
    }

    /// Number of timestamps written so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ts.is_empty()
    }

    /// Timestamps written so far, in write order
    #[inline]
    #[must_use]
    pub fn timestamps(&self) -> &[i64] {
        &self.ts
    }

    /// Drop all written timestamps, keeping the allocation
    #[inline]
    pub fn reset(&mut self) {
        self.ts.clear();
    }

    /// Encode the timestamps written so far
    ///
    /// Leaves the encoder untouched, so calling it twice yields identical bytes.
    /// An encoder with no timestamps encodes to an empty buffer.
    ///
    /// # Errors
    /// Returns [`EncodeError::TooManyElements`] if the count does not fit in 64 bits.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode_with(&self.ts, MAX_EXP)
    }

    /// Finalize and return the encoded bytes
    ///
    /// # Errors
    /// Same as [`Encoder::to_bytes`].
    pub fn finalize(self) -> Result<Vec<u8>, EncodeError> {
        self.to_bytes()
    }
}

impl<const MAX_EXP: u8> Default for Encoder<MAX_EXP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_EXP: u8> Extend<i64> for Encoder<MAX_EXP> {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        self.ts.extend(iter);
    }
}

impl<const MAX_EXP: u8> FromIterator<i64> for Encoder<MAX_EXP> {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut enc = Self::new();
        enc.extend(iter);
        enc
    }
}

/// Encode a slice of timestamps with the default divisor ceiling (10^9)
///
/// # Errors
/// Same as [`Encoder::to_bytes`].
///
/// # Example
/// ```
/// let ts = [1_000, 2_000, 3_500, 3_400];
/// let bytes = tsdelta::encode(&ts).unwrap();
/// assert_eq!(tsdelta::decode(&bytes).unwrap(), ts);
/// ```
pub fn encode(ts: &[i64]) -> Result<Vec<u8>, EncodeError> {
    encode_with(ts, DEFAULT_MAX_EXP)
}

/// Select a layout for `ts` and encode it
///
/// Priority: constant delta, then packed, then raw when a delta outgrows the packer.
fn encode_with(ts: &[i64], max_exp: u8) -> Result<Vec<u8>, EncodeError> {
    let Some(norm) = normalize(ts, max_exp) else {
        return Ok(Vec::new());
    };
    let count = u64::try_from(ts.len()).map_err(|_| EncodeError::TooManyElements { count: ts.len() })?;

    let (encoding, bytes) = if norm.is_arithmetic() {
        (Encoding::ConstantDelta, encode_constant_delta(&norm, count))
    } else {
        match encode_packed(&norm) {
            Some(bytes) => (Encoding::Packed, bytes),
            None => (Encoding::Raw, encode_raw(ts)),
        }
    };

    debug!(
        count,
        %encoding,
        divisor = norm.divisor(),
        bytes = bytes.len(),
        "encoded timestamps"
    );
    Ok(bytes)
}

/// Header, first value, zigzag delta, count
fn encode_constant_delta(norm: &Normalized, count: u64) -> Vec<u8> {
    // Two varints take at most 20 bytes
    let mut out = Vec::with_capacity(HEADER_SIZE + WORD_SIZE + 20);
    out.push(Header::new(Encoding::ConstantDelta, norm.exponent).to_byte());
    out.extend_from_slice(&norm.first.to_be_bytes());
    write_varint(norm.deltas.first().copied().unwrap_or(0), &mut out);
    write_uvarint(count, &mut out);
    out
}

/// Header, first value, packed zigzag deltas
///
/// Returns `None` when a delta is too large to pack.
fn encode_packed(norm: &Normalized) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_SIZE + WORD_SIZE);
    out.push(Header::new(Encoding::Packed, norm.exponent).to_byte());
    out.extend_from_slice(&norm.first.to_be_bytes());

    match pack(&norm.zigzag_deltas(), &mut out) {
        Ok(()) => Some(out),
        Err(err) => {
            debug!(%err, "deltas exceed packing range, falling back to raw");
            None
        }
    }
}

/// Header followed by every timestamp, unscaled
fn encode_raw(ts: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + ts.len() * WORD_SIZE);
    out.push(Header::new(Encoding::Raw, 0).to_byte());
    for &t in ts {
        out.extend_from_slice(&t.to_be_bytes());
    }
    out
}
