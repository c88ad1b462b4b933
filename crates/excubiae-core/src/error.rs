//! # Error Types — Codec Failures
//!
//! Every structural failure while parsing evidence, configuration bytes, or
//! textual identifiers surfaces as a [`CodecError`]. Decoding never falls back
//! to a default value: a blob that cannot be read in full is rejected.

use thiserror::Error;

/// Failure to decode or parse an encoded value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before a complete word could be read.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEnd {
        /// Byte offset of the attempted read.
        offset: usize,
        /// Bytes required by the read.
        needed: usize,
        /// Bytes remaining after `offset`.
        available: usize,
    },

    /// A dynamic value pointed outside the input.
    #[error("offset {offset} out of range for input of {len} bytes")]
    InvalidOffset {
        /// The decoded offset.
        offset: usize,
        /// Total input length.
        len: usize,
    },

    /// An address word carried non-zero bytes in its 12-byte padding.
    #[error("address word at offset {offset} has non-zero padding")]
    DirtyAddress {
        /// Byte offset of the offending word.
        offset: usize,
    },

    /// A boolean word held a value other than 0 or 1.
    #[error("boolean word at offset {offset} is neither 0 nor 1")]
    InvalidBool {
        /// Byte offset of the offending word.
        offset: usize,
    },

    /// A 256-bit value did not fit the requested native integer.
    #[error("value {0} overflows the target integer type")]
    Overflow(String),

    /// A decoded tuple had fewer values than the target structure.
    #[error("missing value at position {index}")]
    MissingToken {
        /// Zero-based position in the tuple.
        index: usize,
    },

    /// A decoded value had a different kind than the target field.
    #[error("expected {expected} at position {index}, found {found}")]
    UnexpectedToken {
        /// Zero-based position in the tuple.
        index: usize,
        /// Kind the target field requires.
        expected: &'static str,
        /// Kind actually decoded.
        found: &'static str,
    },

    /// A fixed-size array had the wrong number of elements.
    #[error("expected {expected} elements, found {actual}")]
    LengthMismatch {
        /// Required element count.
        expected: usize,
        /// Element count present.
        actual: usize,
    },

    /// A textual value was not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A textual value was not a valid decimal or hex integer.
    #[error("invalid integer literal: {0}")]
    InvalidInteger(String),

    /// A phase discriminant outside `0..=2`.
    #[error("invalid phase discriminant {0}")]
    InvalidPhase(u8),
}
