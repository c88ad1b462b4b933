//! # Identity-Document Proof Checker
//!
//! Evidence is an [`AnonAadhaarProof`]. The proof must be generated for the
//! configured nullifier seed, its signal must be the subject's address
//! (read as `uint160`), and the external verifier must accept it.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::AadhaarVerifier;
use crate::traits::Checker;

/// Number of revealed attribute slots.
pub const REVEAL_SLOTS: usize = 4;

/// Number of words in the Groth16 proof.
pub const GROTH16_WORDS: usize = 8;

/// A proof over an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonAadhaarProof {
    /// Application-specific seed the nullifier was derived from.
    pub nullifier_seed: Word,
    /// Per-document, per-seed nullifier.
    pub nullifier: Word,
    /// Document signature time.
    pub timestamp: Word,
    /// Value the proof commits to; must be the subject.
    pub signal: Word,
    /// Selectively revealed attributes.
    pub reveal_array: [Word; REVEAL_SLOTS],
    /// Proof points.
    pub groth16_proof: [Word; GROTH16_WORDS],
}

impl AbiType for AnonAadhaarProof {
    fn param_types() -> Vec<ParamType> {
        vec![
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::FixedArray(Box::new(ParamType::Uint), REVEAL_SLOTS),
            ParamType::FixedArray(Box::new(ParamType::Uint), GROTH16_WORDS),
        ]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Uint(self.nullifier_seed),
            Token::Uint(self.nullifier),
            Token::Uint(self.timestamp),
            Token::Uint(self.signal),
            Token::uint_fixed_array(&self.reveal_array),
            Token::uint_fixed_array(&self.groth16_proof),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            nullifier_seed: t.uint()?,
            nullifier: t.uint()?,
            timestamp: t.uint()?,
            signal: t.uint()?,
            reveal_array: t.fixed_words()?,
            groth16_proof: t.fixed_words()?,
        })
    }
}

/// Configuration: verifier and the application's nullifier seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonAadhaarConfig {
    /// Verifier address.
    pub verifier: Address,
    /// Seed every accepted proof must be generated for.
    pub nullifier_seed: Word,
}

impl AbiType for AnonAadhaarConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Uint]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.verifier), Token::Uint(self.nullifier_seed)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            verifier: t.address()?,
            nullifier_seed: t.uint()?,
        })
    }
}

/// Identity-document proof check.
#[derive(Debug, Clone)]
pub struct AnonAadhaarChecker {
    verifier: Bound<dyn AadhaarVerifier>,
    nullifier_seed: Word,
}

impl AnonAadhaarChecker {
    /// A checker over `verifier` for proofs generated with `nullifier_seed`.
    pub fn new(verifier: Bound<dyn AadhaarVerifier>, nullifier_seed: Word) -> Self {
        Self {
            verifier,
            nullifier_seed,
        }
    }
}

impl Checker for AnonAadhaarChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let proof = AnonAadhaarProof::abi_decode(evidence)?;
        if proof.nullifier_seed != self.nullifier_seed {
            return Err(CheckerError::InvalidNullifierSeed(proof.nullifier_seed));
        }
        if proof.signal != subject.to_word() {
            return Err(CheckerError::InvalidSignal(proof.signal));
        }
        if !self.verifier.verify_proof(&proof)? {
            return Err(CheckerError::InvalidProof);
        }
        Ok(true)
    }
}

impl Clonable for AnonAadhaarChecker {
    const NAME: &'static str = "AnonAadhaar";
    type Config = AnonAadhaarConfig;
    type Bindings = Bound<dyn AadhaarVerifier>;
    type Error = CheckerError;

    fn initialize(
        config: AnonAadhaarConfig,
        verifier: Self::Bindings,
    ) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("verifier", config.verifier, verifier.address())?;
        Ok(Self::new(verifier, config.nullifier_seed))
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::FixedAadhaarVerifier;
    use std::sync::Arc;

    const SEED: u64 = 4_534;

    fn proof_for(subject: &Address, seed: u64) -> AnonAadhaarProof {
        AnonAadhaarProof {
            nullifier_seed: Word::from_u64(seed),
            nullifier: Word::from_u64(77),
            timestamp: Word::from_u64(1_700_000_000),
            signal: subject.to_word(),
            reveal_array: [Word::ZERO; REVEAL_SLOTS],
            groth16_proof: [Word::from_u64(1); GROTH16_WORDS],
        }
    }

    fn checker() -> (AnonAadhaarChecker, Arc<FixedAadhaarVerifier>) {
        let verifier = Arc::new(FixedAadhaarVerifier::new(true));
        let shared: Arc<dyn AadhaarVerifier> = verifier.clone();
        let checker = AnonAadhaarChecker::new(
            Bound::new(Address::derive(b"aadhaar"), shared),
            Word::from_u64(SEED),
        );
        (checker, verifier)
    }

    #[test]
    fn test_valid_proof_admitted() {
        let (checker, _) = checker();
        let subject = Address::derive(b"subject");
        let evidence = proof_for(&subject, SEED).abi_encode();
        assert!(checker.check(&subject, &evidence).unwrap());
    }

    #[test]
    fn test_wrong_seed() {
        let (checker, _) = checker();
        let subject = Address::derive(b"subject");
        let evidence = proof_for(&subject, SEED + 1).abi_encode();
        assert_eq!(
            checker.check(&subject, &evidence),
            Err(CheckerError::InvalidNullifierSeed(Word::from_u64(SEED + 1)))
        );
    }

    #[test]
    fn test_signal_must_be_subject() {
        let (checker, _) = checker();
        let subject = Address::derive(b"subject");
        let other = Address::derive(b"other");
        let evidence = proof_for(&other, SEED).abi_encode();
        assert_eq!(
            checker.check(&subject, &evidence),
            Err(CheckerError::InvalidSignal(other.to_word()))
        );
    }

    #[test]
    fn test_rejected_by_verifier() {
        let (checker, verifier) = checker();
        verifier.set_accept(false);
        let subject = Address::derive(b"subject");
        let evidence = proof_for(&subject, SEED).abi_encode();
        assert_eq!(checker.check(&subject, &evidence), Err(CheckerError::InvalidProof));
    }

    #[test]
    fn test_proof_layout_is_static() {
        let subject = Address::derive(b"subject");
        // 4 scalars + 4 reveal slots + 8 proof words, no offsets.
        assert_eq!(proof_for(&subject, SEED).abi_encode().len(), 16 * 32);
    }
}
