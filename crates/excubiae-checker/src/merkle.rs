//! # Merkle Membership Checker
//!
//! Admits subjects that are leaves of an allowlist tree. The root is fixed
//! at creation; evidence is the ABI encoding of the sibling path
//! (`bytes32[]`).
//!
//! ## Security Invariant
//!
//! Leaf and node hashing are the ones in `excubiae_crypto::merkle`, the
//! same functions the off-line tree builder uses. A path that does not
//! recompute the root fails with `InvalidProof`; it is never a silent `false`.

use excubiae_clone::Clonable;
use excubiae_core::abi::{decode, encode};
use excubiae_core::{AbiType, Address, CodecError, ParamType, Token, TokenStream, Word};
use excubiae_crypto::merkle::{address_leaf, verify_proof};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::traits::Checker;

/// Configuration: the allowlist root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProofConfig {
    /// Root of the allowlist tree. Must be non-zero.
    pub root: Word,
}

impl AbiType for MerkleProofConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::FixedBytes]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::FixedBytes(self.root)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self { root: t.bytes32()? })
    }
}

/// Allowlist membership via Merkle proof.
#[derive(Debug, Clone)]
pub struct MerkleProofChecker {
    root: Word,
}

impl MerkleProofChecker {
    /// A checker for `root`. Fails with `InvalidRoot` on zero.
    pub fn new(root: Word) -> Result<Self, CheckerError> {
        if root.is_zero() {
            return Err(CheckerError::InvalidRoot);
        }
        Ok(Self { root })
    }

    /// The configured root.
    pub fn root(&self) -> Word {
        self.root
    }

    /// Encode a sibling path as evidence.
    pub fn evidence(proof: &[Word]) -> Vec<u8> {
        encode(&[Token::bytes32_array(proof)])
    }

    fn decode_proof(evidence: &[u8]) -> Result<Vec<Word>, CheckerError> {
        let tokens = decode(&[ParamType::Array(Box::new(ParamType::FixedBytes))], evidence)?;
        Ok(TokenStream::new(tokens).words()?)
    }
}

impl Checker for MerkleProofChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let proof = Self::decode_proof(evidence)?;
        if !verify_proof(&self.root, address_leaf(subject), &proof) {
            return Err(CheckerError::InvalidProof);
        }
        Ok(true)
    }
}

impl Clonable for MerkleProofChecker {
    const NAME: &'static str = "MerkleProof";
    type Config = MerkleProofConfig;
    type Bindings = ();
    type Error = CheckerError;

    fn initialize(config: MerkleProofConfig, _bindings: ()) -> Result<Self, CheckerError> {
        Self::new(config.root)
    }
}
