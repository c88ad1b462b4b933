//! # External Registry Capabilities
//!
//! The state sources checkers consult. Each is a narrow trait; concrete
//! registries live outside the engine. Reference in-memory versions ship in
//! [`crate::memory`].
//!
//! Errors from these traits propagate out of `check` unchanged, so a
//! nonexistent token surfaces as [`RegistryError::NonexistentToken`] rather
//! than as a rejection.

use excubiae_core::{Address, Word};
use serde::{Deserialize, Serialize};

use crate::anon_aadhaar::AnonAadhaarProof;
use crate::error::RegistryError;

/// Non-fungible token ownership.
pub trait NftRegistry: Send + Sync {
    /// Current owner of `token_id`.
    fn owner_of(&self, token_id: &Word) -> Result<Address, RegistryError>;

    /// Number of tokens held by `owner`.
    fn balance_of(&self, owner: &Address) -> Result<Word, RegistryError>;
}

/// Fungible token balances.
pub trait TokenBalances: Send + Sync {
    /// Balance of `owner`.
    fn balance_of(&self, owner: &Address) -> Result<Word, RegistryError>;
}

/// Historical voting power.
pub trait VotingPower: Send + Sync {
    /// Votes `account` held at `timepoint`.
    fn past_votes(&self, account: &Address, timepoint: u64) -> Result<Word, RegistryError>;
}

/// An attestation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Unique id.
    pub uid: Word,
    /// Schema the attestation conforms to.
    pub schema: Word,
    /// Who the attestation is about.
    pub recipient: Address,
    /// Who issued it.
    pub attester: Address,
    /// Zero while live; the revocation time once revoked.
    pub revocation_time: u64,
}

impl Attestation {
    /// Whether the attestation has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revocation_time != 0
    }
}

/// Attestation lookup.
pub trait AttestationRegistry: Send + Sync {
    /// The attestation with `uid`.
    fn attestation(&self, uid: &Word) -> Result<Attestation, RegistryError>;
}

/// An external reputation score.
pub trait ScoreOracle: Send + Sync {
    /// Raw score of `subject`, before scaling.
    fn score(&self, subject: &Address) -> Result<Word, RegistryError>;
}

/// Role tokens ("hats").
pub trait HatsRegistry: Send + Sync {
    /// Whether `wearer` currently wears `hat`.
    fn is_wearer_of_hat(&self, wearer: &Address, hat: &Word) -> Result<bool, RegistryError>;
}

/// Identity-document proof verification.
pub trait AadhaarVerifier: Send + Sync {
    /// Whether the proof verifies.
    fn verify_proof(&self, proof: &AnonAadhaarProof) -> Result<bool, RegistryError>;
}
