//! # Semaphore Checker
//!
//! Admits a subject presenting a group-membership proof bound to it.
//!
//! ## Algorithm
//!
//! 1. Decode the evidence as a [`SemaphoreProof`].
//! 2. Split the proof's scope into `(prover, group id)`. The prover must be
//!    the subject (`IncorrectProver`) and the group must be the configured
//!    group (`IncorrectGroupId`). This is what stops a proof generated for
//!    one subject or group from being replayed in another.
//! 3. Hand the proof to the group registry, which verifies it and consumes
//!    its nullifier in one step (`InvalidProof`, `AlreadySpentNullifier`).
//!
//! `preview` runs steps 1 and 2, then asks the registry whether the
//! nullifier is spent and whether the proof verifies, and consumes nothing.
//!
//! ## Security Invariant
//!
//! A successful `check` has consumed the nullifier. A failed one has not.
//! `preview` never consumes.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use excubiae_zkp::{scope, GroupProofRegistry, SemaphoreProof};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::traits::Checker;

/// Configuration: the proof registry and the group to prove membership of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreConfig {
    /// Address of the group proof registry.
    pub semaphore: Address,
    /// Group id.
    pub group_id: Word,
}

impl AbiType for SemaphoreConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Uint]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.semaphore), Token::Uint(self.group_id)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            semaphore: t.address()?,
            group_id: t.uint()?,
        })
    }
}

/// Group membership via zero-knowledge proof.
#[derive(Debug, Clone)]
pub struct SemaphoreChecker {
    registry: Bound<dyn GroupProofRegistry>,
    group_id: Word,
}

impl SemaphoreChecker {
    /// A checker for `group_id` against `registry`.
    ///
    /// Scopes carry only the low 96 bits of the group id. A wider id could
    /// never match a proof and fails with [`CheckerError::GroupIdTooWide`].
    pub fn new(registry: Bound<dyn GroupProofRegistry>, group_id: Word) -> Result<Self, CheckerError> {
        if !scope::fits(&group_id) {
            return Err(CheckerError::GroupIdTooWide(group_id));
        }
        Ok(Self { registry, group_id })
    }

    /// The configured group.
    pub fn group_id(&self) -> Word {
        self.group_id
    }

    /// The registry address.
    pub fn registry(&self) -> Address {
        self.registry.address()
    }

    /// Encode a proof as evidence.
    pub fn evidence(proof: &SemaphoreProof) -> Vec<u8> {
        proof.abi_encode()
    }

    /// Decode `evidence` and require its scope to bind `subject` and the
    /// configured group.
    fn bound_proof(&self, subject: &Address, evidence: &[u8]) -> Result<SemaphoreProof, CheckerError> {
        let proof = SemaphoreProof::abi_decode(evidence)?;

        let prover = scope::prover(&proof.scope);
        if prover != *subject {
            return Err(CheckerError::IncorrectProver {
                expected: *subject,
                actual: prover,
            });
        }
        let group = scope::group_id(&proof.scope);
        if group != self.group_id {
            return Err(CheckerError::IncorrectGroupId {
                expected: self.group_id,
                actual: group,
            });
        }
        Ok(proof)
    }
}

/// Read the nullifier out of Semaphore evidence without verifying anything.
pub fn evidence_nullifier(evidence: &[u8]) -> Result<Word, CodecError> {
    Ok(SemaphoreProof::abi_decode(evidence)?.nullifier)
}

impl Checker for SemaphoreChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let proof = self.bound_proof(subject, evidence)?;
        self.registry.validate_proof(&self.group_id, &proof)?;
        Ok(true)
    }

    fn preview(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let proof = self.bound_proof(subject, evidence)?;
        if self.registry.is_spent(&proof.nullifier) {
            return Err(CheckerError::AlreadySpentNullifier(proof.nullifier));
        }
        if !self.registry.verify_proof(&self.group_id, &proof)? {
            return Err(CheckerError::InvalidProof);
        }
        Ok(true)
    }
}

impl Clonable for SemaphoreChecker {
    const NAME: &'static str = "Semaphore";
    type Config = SemaphoreConfig;
    type Bindings = Bound<dyn GroupProofRegistry>;
    type Error = CheckerError;

    fn initialize(config: SemaphoreConfig, registry: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("semaphore", config.semaphore, registry.address())?;
        Self::new(registry, config.group_id)
    }
}
