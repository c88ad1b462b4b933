//! # ABI Word Codec
//!
//! Evidence blobs and appended clone configuration share one layout: a
//! tuple of values in 32-byte words. Static values (address, uint256, bool,
//! bytes32, fixed arrays of static values) are written inline in the head.
//! Dynamic values (`bytes`, dynamic arrays, fixed arrays of dynamic values)
//! are written in the tail and referenced from the head by a byte offset
//! relative to the start of the enclosing tuple.
//!
//! ## Security Invariant
//!
//! Decoding is strict. Short input, offsets outside the buffer, address words
//! with dirty padding, and booleans other than 0/1 are rejected with a
//! [`CodecError`]. Array lengths are bounded by the bytes actually present
//! before any allocation happens.

use crate::error::CodecError;
use crate::identity::{Address, Word};

const WORD: usize = 32;

/// The shape of a value to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte address, left-padded.
    Address,
    /// 256-bit unsigned integer.
    Uint,
    /// Boolean word.
    Bool,
    /// Opaque 32-byte value.
    FixedBytes,
    /// Length-prefixed byte string.
    Bytes,
    /// Length-prefixed array.
    Array(Box<ParamType>),
    /// Array of fixed length.
    FixedArray(Box<ParamType>, usize),
}

/// A decoded or to-be-encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 20-byte address.
    Address(Address),
    /// 256-bit unsigned integer.
    Uint(Word),
    /// Boolean.
    Bool(bool),
    /// Opaque 32-byte value.
    FixedBytes(Word),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Dynamic-length array.
    Array(Vec<Token>),
    /// Fixed-length array.
    FixedArray(Vec<Token>),
}

impl ParamType {
    /// Whether values of this type live in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            Self::FixedArray(inner, len) if !self.is_dynamic() => inner.head_len() * len,
            _ => WORD,
        }
    }
}

impl Token {
    /// Whether this value lives in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes(_) | Self::Array(_) => true,
            Self::FixedArray(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    /// Short kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint256",
            Self::Bool(_) => "bool",
            Self::FixedBytes(_) => "bytes32",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::FixedArray(_) => "fixed array",
        }
    }

    fn head_len(&self) -> usize {
        match self {
            Self::FixedArray(items) if !self.is_dynamic() => {
                items.iter().map(Token::head_len).sum()
            }
            _ => WORD,
        }
    }

    /// Convenience constructor for a `uint256` from a native integer.
    pub fn uint(value: u64) -> Self {
        Self::Uint(Word::from_u64(value))
    }

    /// Array of `uint256` values.
    pub fn uint_array(values: &[Word]) -> Self {
        Self::Array(values.iter().copied().map(Self::Uint).collect())
    }

    /// Array of `bytes32` values.
    pub fn bytes32_array(values: &[Word]) -> Self {
        Self::Array(values.iter().copied().map(Self::FixedBytes).collect())
    }

    /// Fixed array of `uint256` values.
    pub fn uint_fixed_array(values: &[Word]) -> Self {
        Self::FixedArray(values.iter().copied().map(Self::Uint).collect())
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a tuple of values.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(offset_word(head_len + tail.len()).as_bytes());
            encode_dynamic(token, &mut tail);
        } else {
            encode_static(token, &mut head);
        }
    }
    head.extend_from_slice(&tail);
    head
}

fn offset_word(offset: usize) -> Word {
    Word::from_u64(offset as u64)
}

fn encode_static(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::Address(a) => out.extend_from_slice(a.to_word().as_bytes()),
        Token::Uint(w) | Token::FixedBytes(w) => out.extend_from_slice(w.as_bytes()),
        Token::Bool(b) => out.extend_from_slice(Word::from_u64(u64::from(*b)).as_bytes()),
        Token::FixedArray(items) => items.iter().for_each(|t| encode_static(t, out)),
        Token::Bytes(_) | Token::Array(_) => encode_dynamic(token, out),
    }
}

fn encode_dynamic(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::Bytes(bytes) => {
            out.extend_from_slice(offset_word(bytes.len()).as_bytes());
            out.extend_from_slice(bytes);
            let pad = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(pad));
        }
        Token::Array(items) => {
            out.extend_from_slice(offset_word(items.len()).as_bytes());
            out.extend_from_slice(&encode(items));
        }
        Token::FixedArray(items) => out.extend_from_slice(&encode(items)),
        _ => encode_static(token, out),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a tuple of values of the given types.
///
/// Trailing bytes after the last value are ignored, matching the permissive
/// framing of the encoder's consumers.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, CodecError> {
    decode_tuple(types, data, 0)
}

fn decode_tuple(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, CodecError> {
    let mut cursor = base;
    let mut tokens = Vec::with_capacity(types.len());
    for ty in types {
        if ty.is_dynamic() {
            let offset = read_usize(data, cursor)?;
            let start = base
                .checked_add(offset)
                .filter(|s| *s <= data.len())
                .ok_or(CodecError::InvalidOffset {
                    offset,
                    len: data.len(),
                })?;
            tokens.push(decode_dynamic(ty, data, start)?);
            cursor += WORD;
        } else {
            tokens.push(decode_static(ty, data, cursor)?);
            cursor += ty.head_len();
        }
    }
    Ok(tokens)
}

fn decode_static(ty: &ParamType, data: &[u8], at: usize) -> Result<Token, CodecError> {
    match ty {
        ParamType::Address => {
            let word = read_word(data, at)?;
            word.to_address()
                .map(Token::Address)
                .ok_or(CodecError::DirtyAddress { offset: at })
        }
        ParamType::Uint => Ok(Token::Uint(read_word(data, at)?)),
        ParamType::FixedBytes => Ok(Token::FixedBytes(read_word(data, at)?)),
        ParamType::Bool => match read_word(data, at)?.to_u64() {
            Some(0) => Ok(Token::Bool(false)),
            Some(1) => Ok(Token::Bool(true)),
            _ => Err(CodecError::InvalidBool { offset: at }),
        },
        ParamType::FixedArray(inner, len) => {
            let mut items = Vec::with_capacity(*len);
            let mut cursor = at;
            for _ in 0..*len {
                items.push(decode_static(inner, data, cursor)?);
                cursor += inner.head_len();
            }
            Ok(Token::FixedArray(items))
        }
        ParamType::Bytes | ParamType::Array(_) => decode_dynamic(ty, data, at),
    }
}

fn decode_dynamic(ty: &ParamType, data: &[u8], at: usize) -> Result<Token, CodecError> {
    match ty {
        ParamType::Bytes => {
            let len = read_usize(data, at)?;
            let body = at + WORD;
            let end = body.checked_add(len).ok_or(CodecError::InvalidOffset {
                offset: len,
                len: data.len(),
            })?;
            let bytes = data.get(body..end).ok_or(CodecError::UnexpectedEnd {
                offset: body,
                needed: len,
                available: data.len().saturating_sub(body),
            })?;
            Ok(Token::Bytes(bytes.to_vec()))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let body = at + WORD;
            let remaining_words = data.len().saturating_sub(body) / WORD;
            if len > remaining_words {
                return Err(CodecError::UnexpectedEnd {
                    offset: body,
                    needed: len.saturating_mul(WORD),
                    available: data.len().saturating_sub(body),
                });
            }
            let types = vec![(**inner).clone(); len];
            decode_tuple(&types, data, body).map(Token::Array)
        }
        ParamType::FixedArray(inner, len) => {
            let types = vec![(**inner).clone(); *len];
            decode_tuple(&types, data, at).map(Token::FixedArray)
        }
        _ => decode_static(ty, data, at),
    }
}

fn read_word(data: &[u8], at: usize) -> Result<Word, CodecError> {
    let slice = at
        .checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or(CodecError::UnexpectedEnd {
            offset: at,
            needed: WORD,
            available: data.len().saturating_sub(at),
        })?;
    let mut bytes = [0u8; WORD];
    bytes.copy_from_slice(slice);
    Ok(Word(bytes))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, CodecError> {
    let word = read_word(data, at)?;
    word.to_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| CodecError::Overflow(word.to_string()))
}

// ---------------------------------------------------------------------------
// Structured access
// ---------------------------------------------------------------------------

/// Sequential reader over a decoded tuple.
///
/// Each accessor consumes the next value and fails with a positioned
/// [`CodecError`] when the value is missing or of the wrong kind.
#[derive(Debug)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    index: usize,
}

macro_rules! scalar_accessor {
    ($name:ident, $variant:ident, $ty:ty, $kind:literal) => {
        #[doc = concat!("Read the next value as `", $kind, "`.")]
        pub fn $name(&mut self) -> Result<$ty, CodecError> {
            match self.next()? {
                (_, Token::$variant(v)) => Ok(v),
                (index, other) => Err(CodecError::UnexpectedToken {
                    index,
                    expected: $kind,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl TokenStream {
    /// Wrap a decoded tuple.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            index: 0,
        }
    }

    fn next(&mut self) -> Result<(usize, Token), CodecError> {
        let index = self.index;
        let token = self
            .tokens
            .next()
            .ok_or(CodecError::MissingToken { index })?;
        self.index += 1;
        Ok((index, token))
    }

    scalar_accessor!(address, Address, Address, "address");
    scalar_accessor!(uint, Uint, Word, "uint256");
    scalar_accessor!(boolean, Bool, bool, "bool");
    scalar_accessor!(bytes32, FixedBytes, Word, "bytes32");
    scalar_accessor!(bytes, Bytes, Vec<u8>, "bytes");

    /// Read the next value as a dynamic array of `uint256` or `bytes32`.
    pub fn words(&mut self) -> Result<Vec<Word>, CodecError> {
        match self.next()? {
            (index, Token::Array(items)) => words_of(index, items),
            (index, other) => Err(CodecError::UnexpectedToken {
                index,
                expected: "array",
                found: other.kind(),
            }),
        }
    }

    /// Read the next value as a fixed array of exactly `N` words.
    pub fn fixed_words<const N: usize>(&mut self) -> Result<[Word; N], CodecError> {
        let (index, items) = match self.next()? {
            (index, Token::FixedArray(items)) => (index, items),
            (index, other) => {
                return Err(CodecError::UnexpectedToken {
                    index,
                    expected: "fixed array",
                    found: other.kind(),
                })
            }
        };
        let words = words_of(index, items)?;
        let actual = words.len();
        words
            .try_into()
            .map_err(|_| CodecError::LengthMismatch {
                expected: N,
                actual,
            })
    }
}

fn words_of(index: usize, items: Vec<Token>) -> Result<Vec<Word>, CodecError> {
    items
        .into_iter()
        .map(|t| match t {
            Token::Uint(w) | Token::FixedBytes(w) => Ok(w),
            other => Err(CodecError::UnexpectedToken {
                index,
                expected: "word",
                found: other.kind(),
            }),
        })
        .collect()
}

/// A structure with a fixed ABI tuple layout.
pub trait AbiType: Sized {
    /// The tuple layout.
    fn param_types() -> Vec<ParamType>;

    /// Flatten into a tuple of values.
    fn to_tokens(&self) -> Vec<Token>;

    /// Rebuild from a decoded tuple.
    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError>;

    /// Encode to bytes.
    fn abi_encode(&self) -> Vec<u8> {
        encode(&self.to_tokens())
    }

    /// Decode from bytes.
    fn abi_decode(data: &[u8]) -> Result<Self, CodecError> {
        Self::from_tokens(decode(&Self::param_types(), data)?)
    }
}
