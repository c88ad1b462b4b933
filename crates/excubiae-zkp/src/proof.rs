//! # Semaphore Proof Transcript
//!
//! The evidence blob a Semaphore checker receives is the ABI tuple
//! `(uint256 merkleTreeDepth, uint256 merkleTreeRoot, uint256 nullifier,
//! uint256 message, uint256 scope, uint256[8] points)`.

use excubiae_core::abi::{AbiType, ParamType, Token, TokenStream};
use excubiae_core::{CodecError, Word};
use serde::{Deserialize, Serialize};

/// Number of group elements in a proof.
pub const PROOF_POINTS: usize = 8;

/// A membership proof transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreProof {
    /// Depth of the group tree the proof was generated against.
    pub merkle_tree_depth: u64,
    /// Group root the proof commits to.
    pub merkle_tree_root: Word,
    /// Single-use tag derived from the identity and the scope.
    pub nullifier: Word,
    /// Signal the prover attests to.
    pub message: Word,
    /// Context binding, see [`crate::scope`].
    pub scope: Word,
    /// Proof group elements.
    pub points: [Word; PROOF_POINTS],
}

impl SemaphoreProof {
    /// The public inputs in transcript order, without the proof points.
    pub fn public_inputs(&self) -> Vec<Token> {
        vec![
            Token::uint(self.merkle_tree_depth),
            Token::Uint(self.merkle_tree_root),
            Token::Uint(self.nullifier),
            Token::Uint(self.message),
            Token::Uint(self.scope),
        ]
    }
}

impl AbiType for SemaphoreProof {
    fn param_types() -> Vec<ParamType> {
        vec![
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::FixedArray(Box::new(ParamType::Uint), PROOF_POINTS),
        ]
    }

    fn to_tokens(&self) -> Vec<Token> {
        let mut tokens = self.public_inputs();
        tokens.push(Token::uint_fixed_array(&self.points));
        tokens
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        let depth = t.uint()?;
        Ok(Self {
            merkle_tree_depth: depth
                .to_u64()
                .ok_or_else(|| CodecError::Overflow(depth.to_string()))?,
            merkle_tree_root: t.uint()?,
            nullifier: t.uint()?,
            message: t.uint()?,
            scope: t.uint()?,
            points: t.fixed_words::<PROOF_POINTS>()?,
        })
    }
}
