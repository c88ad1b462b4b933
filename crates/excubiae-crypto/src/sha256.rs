//! # SHA-256 Word Hashing
//!
//! Every digest in Excubiae is a [`Word`]. Tuple hashing runs over the ABI
//! encoding, so the same structured value hashes identically whether it was
//! produced by the tree builder or decoded from evidence.

use excubiae_core::abi::{encode, Token};
use excubiae_core::Word;
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes.
pub fn sha256_word(data: &[u8]) -> Word {
    let hash = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    Word(out)
}

/// SHA-256 of the ABI encoding of a tuple.
pub fn sha256_tokens(tokens: &[Token]) -> Word {
    sha256_word(&encode(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_empty_vector() {
        assert_eq!(
            sha256_word(b"").to_hex(),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_tokens_hash_encoding() {
        let tokens = [Token::uint(1)];
        assert_eq!(sha256_tokens(&tokens), sha256_word(&encode(&tokens)));
        assert_ne!(sha256_tokens(&tokens), sha256_tokens(&[Token::uint(2)]));
    }
}
