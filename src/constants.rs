//! Internal constants and helper functions for tsdelta encoding.

/// Header size in bytes (tag nibble + exponent nibble)
pub(crate) const HEADER_SIZE: usize = 1;

/// Size of a big-endian i64 in the payload (V0, raw timestamps, packed words)
pub(crate) const WORD_SIZE: usize = 8;

/// Tag nibble for uncompressed timestamps
pub(crate) const TAG_RAW: u8 = 0;

/// Tag nibble for an arithmetic run (first value, delta, count)
pub(crate) const TAG_CONSTANT_DELTA: u8 = 1;

/// Tag nibble for selector-packed deltas
pub(crate) const TAG_PACKED: u8 = 2;

/// Default ceiling for the divisor search: 10^9 (one second in nanoseconds)
pub(crate) const DEFAULT_MAX_EXP: u8 = 9;

/// Highest exponent that fits in the header's low nibble
pub(crate) const MAX_HEADER_EXP: u8 = 15;

/// Largest value the packer accepts (2^60 - 1, ~36.5 years of nanoseconds)
pub(crate) const MAX_PACKED_VALUE: u64 = (1 << 60) - 1;

/// Payload bits per packed word (the top 4 bits hold the selector)
pub(crate) const PAYLOAD_BITS: u32 = 60;

/// Upper bound on timestamps preallocated by `decode`
pub(crate) const MAX_PREALLOC: usize = 1 << 16;

/// Maximum bytes a u64 occupies as a base-128 varint
pub(crate) const MAX_VARINT_LEN: usize = 10;

/// Selector catalogue: (values per word, bits per value)
///
/// Selectors 0 and 1 carry no payload and stand for runs of zeros.
pub(crate) const SELECTORS: [(u32, u32); 16] = [
    (240, 0),
    (120, 0),
    (60, 1),
    (30, 2),
    (20, 3),
    (15, 4),
    (12, 5),
    (10, 6),
    (8, 7),
    (7, 8),
    (6, 10),
    (5, 12),
    (4, 15),
    (3, 20),
    (2, 30),
    (1, 60),
];

/// 10^exp as i64
///
/// Every exponent that fits in a header nibble (0..=15) is representable.
#[inline]
pub(crate) const fn pow10(exp: u8) -> i64 {
    10_i64.pow(exp as u32)
}

/// Mask selecting the low `bits` bits of a word
#[inline]
pub(crate) const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
