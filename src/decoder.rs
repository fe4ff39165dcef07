//! Decoding functionality for tsdelta encoded data.

use crate::constants::{MAX_PREALLOC, WORD_SIZE};
use crate::error::DecodeError;
use crate::header::{check_len, check_words, Encoding, Header};
use crate::packing::Unpacker;
use crate::varint::{read_uvarint, read_varint, zigzag_decode};

/// Cursor state: either holding a readable value or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Exhausted,
    Positioned(i64),
}

/// Per-layout iteration state, prepared once by [`Decoder::new`]
#[derive(Debug, Clone)]
enum Blocks<'a> {
    Empty,
    Raw {
        words: &'a [u8],
    },
    ConstantDelta {
        next: i64,
        step: i64,
        remaining: u64,
    },
    Packed {
        first: Option<i64>,
        acc: i64,
        divisor: i64,
        deltas: Unpacker<'a>,
    },
}

/// Pull decoder over an encoded block
///
/// Borrows the buffer; only the cursor is owned. The whole payload is validated
/// up front, so a decoder that was constructed successfully never fails later.
///
/// # Example
/// ```
/// use tsdelta::{Decoder, Encoder};
///
/// let mut enc: Encoder = Encoder::new();
/// enc.write(3);
/// enc.write(2);
/// enc.write(1);
/// let bytes = enc.finalize().unwrap();
///
/// let mut dec = Decoder::new(&bytes).unwrap();
/// let mut out = Vec::new();
/// while dec.next() {
///     out.push(dec.read().unwrap());
/// }
/// assert_eq!(out, [3, 2, 1]);
/// assert!(!dec.next());
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    encoding: Option<Encoding>,
    state: State,
    blocks: Blocks<'a>,
}

impl<'a> Decoder<'a> {
    /// Parse the header and prepare to iterate
    ///
    /// An empty buffer decodes to zero timestamps.
    ///
    /// # Errors
    /// - [`DecodeError::UnknownEncodingTag`] if the header names no known layout
    /// - [`DecodeError::TruncatedInput`] if the payload is cut short
    /// - [`DecodeError::MalformedPayload`] if a varint is oversized or bytes trail
    ///   a constant-delta payload
    pub fn new(buf: &'a [u8]) -> Result<Self, DecodeError> {
        let Some((&first, payload)) = buf.split_first() else {
            return Ok(Self { encoding: None, state: State::Exhausted, blocks: Blocks::Empty });
        };
        let header = Header::from_byte(first)?;

        let blocks = match header.encoding {
            Encoding::Raw => {
                check_words(payload)?;
                Blocks::Raw { words: payload }
            }
            Encoding::ConstantDelta => {
                let first = read_first(payload)?;
                let mut offset = WORD_SIZE;
                let delta = read_varint(payload, &mut offset)?;
                let remaining = read_uvarint(payload, &mut offset)?;
                if offset != payload.len() {
                    return Err(DecodeError::MalformedPayload);
                }
                Blocks::ConstantDelta {
                    next: first,
                    step: delta.wrapping_mul(header.divisor()),
                    remaining,
                }
            }
            Encoding::Packed => {
                let first = read_first(payload)?;
                check_words(payload)?;
                Blocks::Packed {
                    first: Some(first),
                    acc: first,
                    divisor: header.divisor(),
                    deltas: Unpacker::new(&payload[WORD_SIZE..])?,
                }
            }
        };

        Ok(Self { encoding: Some(header.encoding), state: State::Exhausted, blocks })
    }

    /// Layout of the block, `None` for the empty buffer
    #[inline]
    #[must_use]
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// Advance to the next timestamp
    ///
    /// Returns `false` once every timestamp has been read, and keeps returning
    /// `false` on later calls.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.state = match self.advance() {
            Some(ts) => State::Positioned(ts),
            None => State::Exhausted,
        };
        matches!(self.state, State::Positioned(_))
    }

    /// Current timestamp
    ///
    /// `None` before the first [`next`](Self::next) and after it returned `false`.
    #[inline]
    #[must_use]
    pub fn read(&self) -> Option<i64> {
        match self.state {
            State::Positioned(ts) => Some(ts),
            State::Exhausted => None,
        }
    }

    /// Number of timestamps not yet reached by [`next`](Self::next)
    #[must_use]
    pub fn remaining(&self) -> usize {
        match &self.blocks {
            Blocks::Empty => 0,
            Blocks::Raw { words } => words.len() / WORD_SIZE,
            Blocks::ConstantDelta { remaining, .. } => usize::try_from(*remaining).unwrap_or(usize::MAX),
            Blocks::Packed { first, deltas, .. } => deltas.remaining() + usize::from(first.is_some()),
        }
    }

    #[inline]
    fn advance(&mut self) -> Option<i64> {
        match &mut self.blocks {
            Blocks::Empty => None,
            Blocks::Raw { words } => {
                let (head, rest) = words.split_first_chunk::<WORD_SIZE>()?;
                *words = rest;
                Some(i64::from_be_bytes(*head))
            }
            Blocks::ConstantDelta { next, step, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                let ts = *next;
                *next = next.wrapping_add(*step);
                Some(ts)
            }
            Blocks::Packed { first, acc, divisor, deltas } => {
                if let Some(ts) = first.take() {
                    return Some(ts);
                }
                let delta = zigzag_decode(deltas.next()?);
                *acc = acc.wrapping_add(delta.wrapping_mul(*divisor));
                Some(*acc)
            }
        }
    }
}

impl<'a> IntoIterator for Decoder<'a> {
    type Item = i64;
    type IntoIter = Timestamps<'a>;

    fn into_iter(self) -> Timestamps<'a> {
        Timestamps { decoder: self }
    }
}

/// Iterator over the timestamps of a block, from [`Decoder::into_iter`]
#[derive(Debug, Clone)]
pub struct Timestamps<'a> {
    decoder: Decoder<'a>,
}

impl Iterator for Timestamps<'_> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        if self.decoder.next() {
            self.decoder.read()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.decoder.remaining();
        (n, Some(n))
    }
}

impl std::iter::FusedIterator for Timestamps<'_> {}

/// Decode a block into its timestamps, in the order they were written
///
/// # Errors
/// Same as [`Decoder::new`].
///
/// # Example
/// ```
/// use tsdelta::{decode, Encoder};
///
/// let mut enc: Encoder = Encoder::new();
/// enc.extend([10, 20, 30, 45]);
/// let bytes = enc.to_bytes().unwrap();
/// assert_eq!(decode(&bytes).unwrap(), [10, 20, 30, 45]);
/// ```
#[must_use = "decoding returns timestamps that should be used"]
pub fn decode(buf: &[u8]) -> Result<Vec<i64>, DecodeError> {
    let mut dec = Decoder::new(buf)?;
    // A constant-delta header can claim any count, so grow by pushing rather
    // than trusting it for the allocation
    let mut out = Vec::with_capacity(dec.remaining().min(MAX_PREALLOC));
    while dec.next() {
        if let Some(ts) = dec.read() {
            out.push(ts);
        }
    }
    Ok(out)
}

/// Read the first timestamp that opens constant-delta and packed payloads
#[inline]
fn read_first(payload: &[u8]) -> Result<i64, DecodeError> {
    check_len(payload, WORD_SIZE)?;
    let mut bytes = [0u8; WORD_SIZE];
    bytes.copy_from_slice(&payload[..WORD_SIZE]);
    Ok(i64::from_be_bytes(bytes))
}
