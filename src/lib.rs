//! `tsdelta` - Lossless compression for nanosecond timestamp sequences
//!
//! An embeddable codec for the timestamp column of a time-series store. Timestamps
//! are written one at a time in any order and come back exactly as written,
//! value for value and order for order.
//!
//! # Features
//! - **Adaptive**: picks the smallest of three layouts per block
//! - **Granularity aware**: deltas are divided by their largest common power of ten,
//!   so second-aligned nanosecond data costs as little as second-resolution data
//! - **Order preserving**: unsorted, repeated and decreasing timestamps round-trip
//! - **Streaming decode**: constant-delta and packed blocks decode in O(1) extra memory
//!
//! # Example
//! ```
//! use tsdelta::{Decoder, Encoder, Encoding};
//!
//! const SECOND: i64 = 1_000_000_000;
//!
//! let mut encoder: Encoder = Encoder::new();
//! for i in 0..500 {
//!     encoder.write(i * SECOND);
//! }
//!
//! // 500 evenly spaced timestamps collapse to a 12 byte arithmetic run
//! let bytes = encoder.finalize().unwrap();
//! assert_eq!(bytes.len(), 12);
//!
//! let mut decoder = Decoder::new(&bytes).unwrap();
//! assert_eq!(decoder.encoding(), Some(Encoding::ConstantDelta));
//! let mut i = 0;
//! while decoder.next() {
//!     assert_eq!(decoder.read(), Some(i * SECOND));
//!     i += 1;
//! }
//! assert_eq!(i, 500);
//! ```
//!
//! # Wire Format
//!
//! An empty sequence encodes to an empty buffer. Otherwise a block is one header
//! byte followed by a layout-specific payload. All fixed-width integers are
//! big-endian.
//!
//! ## Header (1 byte)
//!
//! | Bits | Field | Description |
//! |------|-------|-------------|
//! | 7-4 | `tag` | 0 = raw, 1 = constant delta, 2 = packed |
//! | 3-0 | `exp` | log10 of the delta divisor (constant delta and packed only) |
//!
//! ## Payloads
//!
//! | Layout | Payload | Chosen when |
//! |--------|---------|-------------|
//! | Constant delta | `first: i64`, `delta: zigzag varint`, `count: uvarint` | One timestamp, or all scaled deltas equal |
//! | Packed | `first: i64`, then 64-bit selector words of zigzag scaled deltas | Every zigzag delta is below 2^60 |
//! | Raw | every timestamp as `i64`, unscaled | Some delta needs more than 60 bits |
//!
//! # Internal Implementation
//!
//! ## Divisor Normalization
//!
//! The deltas `ts[i + 1] - ts[i]` are computed with wrapping arithmetic, then the
//! largest `10^e` (`e <= 9` by default, see [`Encoder`]) dividing all of them is
//! found. Zero deltas do not constrain the search. A single timestamp uses `e = 0`.
//!
//! ## Selector Words
//!
//! Packed deltas are stored in 64-bit words. The top 4 bits pick one of 16
//! `(count, bits)` layouts for the remaining 60 bits:
//!
//! | Selector | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 | 12 | 13 | 14 | 15 |
//! |----------|---|---|---|---|---|---|---|---|---|---|----|----|----|----|----|----|
//! | Count | 240 | 120 | 60 | 30 | 20 | 15 | 12 | 10 | 8 | 7 | 6 | 5 | 4 | 3 | 2 | 1 |
//! | Bits | 0 | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 10 | 12 | 15 | 20 | 30 | 60 |
//!
//! Selectors 0 and 1 are runs of zero deltas (repeated timestamps). Words are
//! always full, so the number of deltas follows from the words without a count.
//!
//! ## Supported Ranges
//! - Timestamps: full i64 range
//! - Deltas: any i64 difference; differences beyond i64 wrap and still round-trip
//! - Divisor: `10^0` to `10^15`, selected per block

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

mod constants;
mod decoder;
mod encoder;
mod error;
mod header;
mod normalize;
mod packing;
pub mod varint;

#[cfg(test)]
mod tests;

// Re-export public API
pub use decoder::{decode, Decoder, Timestamps};
pub use encoder::{encode, Encoder};
pub use error::{DecodeError, EncodeError};
pub use header::{inspect, BlockInfo, Encoding};
