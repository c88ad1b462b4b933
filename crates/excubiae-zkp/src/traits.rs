//! # Proof Verification Traits
//!
//! `ProofVerifier` answers one question: is this transcript a valid proof
//! for this group? `GroupProofRegistry` adds group bookkeeping and the
//! nullifier set on top, and is the capability checkers depend on.
//!
//! ## Security Invariant
//!
//! Both traits require `Send + Sync`. `validate_proof` must consume the
//! nullifier atomically with verification: a nullifier is marked spent if
//! and only if the same call verified the proof.

use excubiae_core::Word;
use thiserror::Error;

use crate::proof::SemaphoreProof;

/// Error during proof verification or nullifier bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// No group with this id has been created.
    #[error("group {0} does not exist")]
    GroupNotFound(Word),

    /// A group with this id already exists.
    #[error("group {0} already exists")]
    GroupAlreadyExists(Word),

    /// A root was requested for a group with no members.
    #[error("group {0} has no members")]
    EmptyGroup(Word),

    /// The proof's tree root was never a root of the group.
    #[error("root {root} is not part of group {group}")]
    UnknownRoot {
        /// Group the proof was presented to.
        group: Word,
        /// Root claimed by the proof.
        root: Word,
    },

    /// The proof's tree depth is outside `1..=32`.
    #[error("merkle tree depth {0} is not supported")]
    UnsupportedDepth(u64),

    /// The nullifier was consumed by an earlier proof.
    #[error("nullifier {0} has already been spent")]
    NullifierAlreadySpent(Word),

    /// The transcript does not verify.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}

/// Decides whether a proof transcript is valid for a group.
pub trait ProofVerifier: Send + Sync {
    /// Verify a transcript. `Ok(false)` is a well-formed but invalid proof.
    fn verify(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<bool, VerifyError>;
}

/// A registry of proving groups with nullifier bookkeeping.
pub trait GroupProofRegistry: Send + Sync {
    /// Read-only verification. Does not consult or modify nullifier state.
    fn verify_proof(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<bool, VerifyError>;

    /// Verify and consume the proof's nullifier in one atomic step.
    ///
    /// Fails with [`VerifyError::NullifierAlreadySpent`] if the nullifier was
    /// consumed before, and with [`VerifyError::InvalidProof`] if the
    /// transcript does not verify. On failure nothing is consumed.
    fn validate_proof(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<(), VerifyError>;

    /// Whether a nullifier has been consumed.
    fn is_spent(&self, nullifier: &Word) -> bool;
}
