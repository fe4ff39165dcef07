//! Selector-word integer packing.
//!
//! Values are packed into 64-bit big-endian words. The top 4 bits of a word name
//! a selector from [`SELECTORS`]; the low 60 bits hold `count` values of `bits`
//! bits each, first value in the least significant position. Every word is
//! filled completely, so a decoder recovers the exact count from the words alone.

use crate::constants::{low_mask, MAX_PACKED_VALUE, PAYLOAD_BITS, SELECTORS, WORD_SIZE};
use crate::error::{DecodeError, PackError};

/// Pack `values` greedily into selector words appended to `out`
///
/// At each position the selector holding the most values that all fit is chosen.
///
/// # Errors
/// Returns [`PackError::ValueTooLarge`] for the first value above 2^60 - 1. `out`
/// may hold partially written words in that case and should be discarded.
pub(crate) fn pack(values: &[u64], out: &mut Vec<u8>) -> Result<(), PackError> {
    out.reserve(values.len().div_ceil(4) * WORD_SIZE);

    let mut pos = 0;
    while pos < values.len() {
        let remaining = &values[pos..];
        if remaining[0] > MAX_PACKED_VALUE {
            return Err(PackError::ValueTooLarge { index: pos, value: remaining[0] });
        }
        let (selector, consumed) = select(remaining);
        out.extend_from_slice(&encode_word(selector, &remaining[..consumed]).to_be_bytes());
        pos += consumed;
    }

    Ok(())
}

/// Pick the densest selector whose window over `values` fits entirely
///
/// Falls back to the single 60-bit selector; the caller has checked `values[0]` fits.
#[inline]
fn select(values: &[u64]) -> (u8, usize) {
    let mut max_seen = 0u64;
    let mut scanned = 0usize;

    for (selector, &(count, bits)) in SELECTORS.iter().enumerate() {
        let count = count as usize;
        if count > values.len() {
            continue;
        }
        let limit = low_mask(bits);

        // Counts shrink as widths grow; rescan only when the window got shorter
        if scanned > count {
            max_seen = values[..count].iter().copied().max().unwrap_or(0);
            scanned = count;
        }
        while scanned < count && max_seen <= limit {
            max_seen = max_seen.max(values[scanned]);
            scanned += 1;
        }

        if scanned == count && max_seen <= limit {
            return (selector as u8, count);
        }
    }

    ((SELECTORS.len() - 1) as u8, 1)
}

#[inline]
fn encode_word(selector: u8, window: &[u64]) -> u64 {
    let (_, bits) = SELECTORS[selector as usize];
    let mut word = u64::from(selector) << PAYLOAD_BITS;
    if bits > 0 {
        for (i, &v) in window.iter().enumerate() {
            word |= v << (i as u32 * bits);
        }
    }
    word
}

/// Streaming reader over a packed word stream
///
/// Holds one word at a time; iteration yields the packed values in order.
#[derive(Debug, Clone)]
pub(crate) struct Unpacker<'a> {
    words: &'a [u8],
    word: u64,
    bits: u32,
    left: u32,
}

impl<'a> Unpacker<'a> {
    /// Create an unpacker over a buffer of whole words
    ///
    /// # Errors
    /// Returns [`DecodeError::TruncatedInput`] if the last word is incomplete.
    pub fn new(words: &'a [u8]) -> Result<Self, DecodeError> {
        let rem = words.len() % WORD_SIZE;
        if rem != 0 {
            return Err(DecodeError::TruncatedInput {
                expected: words.len() + (WORD_SIZE - rem),
                actual: words.len(),
            });
        }
        Ok(Self { words, word: 0, bits: 0, left: 0 })
    }

    /// Number of values remaining, computed from the selectors without unpacking
    #[must_use]
    pub fn remaining(&self) -> usize {
        let buffered = self.left as usize;
        buffered
            + self
                .words
                .chunks_exact(WORD_SIZE)
                .map(|w| SELECTORS[usize::from(w[0] >> 4)].0 as usize)
                .sum::<usize>()
    }

    #[inline]
    fn load(&mut self) -> bool {
        let Some((head, rest)) = self.words.split_first_chunk::<WORD_SIZE>() else {
            return false;
        };
        self.words = rest;
        let word = u64::from_be_bytes(*head);
        let (count, bits) = SELECTORS[(word >> PAYLOAD_BITS) as usize];
        self.word = word & low_mask(PAYLOAD_BITS);
        self.bits = bits;
        self.left = count;
        true
    }
}

impl Iterator for Unpacker<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.left == 0 && !self.load() {
            return None;
        }
        self.left -= 1;
        if self.bits == 0 {
            return Some(0);
        }
        let v = self.word & low_mask(self.bits);
        self.word >>= self.bits;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(values: &[u64]) -> Vec<u8> {
        let mut out = Vec::new();
        pack(values, &mut out).unwrap();
        let unpacked: Vec<u64> = Unpacker::new(&out).unwrap().collect();
        assert_eq!(unpacked, values);
        out
    }

    #[test]
    fn test_catalogue_fills_sixty_bits() {
        for (selector, &(count, bits)) in SELECTORS.iter().enumerate().skip(2) {
            assert!(count * bits <= PAYLOAD_BITS, "selector {selector} overflows the payload");
        }
    }

    #[test]
    fn test_empty() {
        assert!(roundtrip(&[]).is_empty());
    }

    #[test]
    fn test_zero_runs_use_zero_width_selectors() {
        let out = roundtrip(&[0; 240]);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0] >> 4, 0);

        let out = roundtrip(&[0; 120]);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0] >> 4, 1);
    }

    #[test]
    fn test_ones_pack_sixty_per_word() {
        let out = roundtrip(&[1; 120]);
        assert_eq!(out.len(), 16);
        assert_eq!(out[0] >> 4, 2);
        assert_eq!(out[8] >> 4, 2);
    }

    #[test]
    fn test_each_selector_width() {
        for &(count, bits) in SELECTORS.iter().skip(2) {
            let max = low_mask(bits);
            let values: Vec<u64> = (0..count as u64).map(|i| max - (i % 2)).collect();
            let out = roundtrip(&values);
            assert_eq!(out.len(), 8, "{count}x{bits} should fill a single word");
        }
    }

    #[test]
    fn test_tail_uses_smaller_selectors() {
        // Too few values for the narrow selectors, so 7x8 is the densest that fills
        let out = roundtrip(&[3, 1, 2, 0, 1, 2, 3]);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0] >> 4, 9);

        // 9 values: 8x7 then 1x60
        let out = roundtrip(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(out.len(), 16);
        assert_eq!(out[0] >> 4, 8);
        assert_eq!(out[8] >> 4, 15);
    }

    #[test]
    fn test_mixed_magnitudes() {
        let values = [0, 1, 1 << 20, 5, MAX_PACKED_VALUE, 0, 0, 1 << 33, 2];
        roundtrip(&values);
    }

    #[test]
    fn test_ceiling_accepted() {
        let out = roundtrip(&[MAX_PACKED_VALUE]);
        assert_eq!(out[0] >> 4, 15);
    }

    #[test]
    fn test_overflow_reports_index() {
        let mut out = Vec::new();
        let err = pack(&[1, 2, MAX_PACKED_VALUE + 1, 3], &mut out).unwrap_err();
        assert_eq!(err, PackError::ValueTooLarge { index: 2, value: MAX_PACKED_VALUE + 1 });
        assert_eq!(
            pack(&[u64::MAX], &mut out),
            Err(PackError::ValueTooLarge { index: 0, value: u64::MAX })
        );
    }

    #[test]
    fn test_remaining_counts_words() {
        let values: Vec<u64> = (0..500).map(|i| i % 7).collect();
        let mut out = Vec::new();
        pack(&values, &mut out).unwrap();

        let mut unpacker = Unpacker::new(&out).unwrap();
        assert_eq!(unpacker.remaining(), 500);
        for _ in 0..123 {
            unpacker.next();
        }
        assert_eq!(unpacker.remaining(), 377);
    }

    #[test]
    fn test_partial_word_is_truncated() {
        let err = Unpacker::new(&[0u8; 12]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedInput { expected: 16, actual: 12 });
    }
}
