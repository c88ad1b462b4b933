//! # Identity and Value Newtypes
//!
//! `Address` identifies every actor the engine reasons about: subjects,
//! targets, gates, administrators, checkers, factories, clones, and external
//! registries. `Word` is the 256-bit big-endian value every numeric or
//! opaque 32-byte field is carried in (roots, nullifiers, balances, ids).
//!
//! ## Security Invariant
//!
//! `Word` orders lexicographically over its big-endian bytes, which is the
//! same as numeric order. Threshold comparisons on balances and scores rely
//! on this and never round-trip through a narrower native integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CodecError;

/// A 20-byte actor identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

/// A 256-bit big-endian value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word(pub [u8; 32]);

impl Address {
    /// The null address. Never a valid target, gate, or Merkle root holder.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Whether this is the null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Derive a stable address from a label: the first 20 bytes of
    /// `SHA-256(label)`.
    pub fn derive(label: &[u8]) -> Self {
        let digest = Sha256::digest(label);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Left-pad into a word (the `uint160` reading of the address).
    pub fn to_word(&self) -> Word {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(&self.0);
        Word(bytes)
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", bytes_to_hex(&self.0))
    }
}

impl Word {
    /// The zero word.
    pub const ZERO: Word = Word([0u8; 32]);

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Widen an unsigned 64-bit integer.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Widen an unsigned 128-bit integer.
    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Narrow to `u64`, or `None` if any higher byte is set.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(buf))
    }

    /// Narrow to `u128`, or `None` if any higher byte is set.
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(buf))
    }

    /// Narrow to `u128`, failing with [`CodecError::Overflow`].
    pub fn try_to_u128(&self) -> Result<u128, CodecError> {
        self.to_u128()
            .ok_or_else(|| CodecError::Overflow(self.to_string()))
    }

    /// Read the low 20 bytes as an address, or `None` if the upper 12 bytes
    /// are not zero.
    pub fn to_address(&self) -> Option<Address> {
        if self.0[..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&self.0[12..]);
        Some(Address(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", bytes_to_hex(&self.0))
    }
}

impl From<[u8; 32]> for Word {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Address> for Word {
    fn from(address: Address) -> Self {
        address.to_word()
    }
}

// ---------------------------------------------------------------------------
// Text encoding
// ---------------------------------------------------------------------------

/// Lowercase hex without prefix.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse hex with an optional `0x` prefix. Odd-length input is left-padded
/// with a single zero nibble.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidHex(s.to_string()));
    }
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CodecError::InvalidHex(s.to_string()))
        })
        .collect()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = CodecError;

    /// Accepts exactly 40 hex digits with an optional `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(CodecError::InvalidHex(s.to_string()));
        }
        let raw = hex_to_bytes(digits)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl FromStr for Word {
    type Err = CodecError;

    /// `0x`-prefixed input is read as hex of up to 64 digits, left-padded.
    /// Anything else is read as a decimal `u128`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("0x") {
            Some(digits) => {
                if digits.is_empty() || digits.len() > 64 {
                    return Err(CodecError::InvalidHex(s.to_string()));
                }
                let raw = hex_to_bytes(digits)?;
                let mut bytes = [0u8; 32];
                bytes[32 - raw.len()..].copy_from_slice(&raw);
                Ok(Self(bytes))
            }
            None => s
                .parse::<u128>()
                .map(Self::from_u128)
                .map_err(|_| CodecError::InvalidInteger(s.to_string())),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
