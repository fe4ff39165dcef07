//! Error types for tsdelta encoding and decoding operations.

use std::fmt;

/// Error returned when finalizing an encoder fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Element count cannot be stored in the 64-bit count field
    TooManyElements { count: usize },
}

/// Error returned when decoding fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer ends before a complete header or payload element
    TruncatedInput { expected: usize, actual: usize },
    /// Header tag nibble does not name a known encoding
    UnknownEncodingTag { tag: u8 },
    /// Payload is structurally invalid (oversized varint, trailing bytes)
    MalformedPayload,
}

/// Raised by the packer when a value needs more than 60 bits.
///
/// Never surfaces to callers: the encoder answers it by switching to the raw layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PackError {
    ValueTooLarge { index: usize, value: u64 },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyElements { count } => {
                write!(f, "too many timestamps ({count}) for a 64-bit count")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput { expected, actual } => {
                write!(f, "truncated input: expected at least {expected} bytes, got {actual}")
            }
            Self::UnknownEncodingTag { tag } => write!(f, "unknown encoding tag {tag}"),
            Self::MalformedPayload => write!(f, "encoded payload is malformed or corrupted"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueTooLarge { index, value } => {
                write!(f, "value {value} at index {index} exceeds the 60-bit packing limit")
            }
        }
    }
}
