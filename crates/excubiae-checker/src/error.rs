//! # Error Types — Checker Failures
//!
//! A checker answers `Ok(true)`, `Ok(false)`, or fails with one of these.
//! `Ok(false)` is a retryable "no"; an error aborts the enclosing
//! enforcement call and is surfaced to the caller unchanged.

use excubiae_clone::FactoryError;
use excubiae_core::{Address, CodecError, Word};
use excubiae_zkp::VerifyError;
use thiserror::Error;

/// Failure reported by an external registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The referenced token id was never minted or has been burned.
    #[error("token {0} does not exist")]
    NonexistentToken(Word),

    /// No attestation with this uid.
    #[error("attestation {0} not found")]
    AttestationNotFound(Word),

    /// The registry could not answer.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Error from a checker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckerError {
    /// Clone lifecycle failure (uninitialized, re-initialized, mis-bound).
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Evidence or configuration could not be decoded.
    #[error("malformed evidence: {0}")]
    Codec(#[from] CodecError),

    /// An external registry failed; propagated untranslated.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Proof registry failure other than an invalid proof or spent nullifier.
    #[error("proof registry: {0}")]
    Proof(VerifyError),

    /// A Merkle root of zero was configured.
    #[error("merkle root must be non-zero")]
    InvalidRoot,

    /// The proof does not verify.
    #[error("invalid proof")]
    InvalidProof,

    /// The proof's scope names a different prover than the subject.
    #[error("proof scope binds prover {actual}, expected {expected}")]
    IncorrectProver {
        /// The subject being checked.
        expected: Address,
        /// The prover encoded in the scope.
        actual: Address,
    },

    /// The proof's scope names a different group than the configured one.
    #[error("proof scope binds group {actual}, expected {expected}")]
    IncorrectGroupId {
        /// The configured group.
        expected: Word,
        /// The group encoded in the scope.
        actual: Word,
    },

    /// The proof's nullifier was consumed before.
    #[error("nullifier {0} already spent")]
    AlreadySpentNullifier(Word),

    /// Token or voting balance under the threshold.
    #[error("balance {balance} below threshold {threshold}")]
    BalanceTooLow {
        /// Observed balance.
        balance: Word,
        /// Required minimum.
        threshold: Word,
    },

    /// External score under the passing score.
    #[error("score {score} below passing score {passing}")]
    ScoreTooLow {
        /// Observed score, already scaled.
        score: u128,
        /// Required minimum.
        passing: u128,
    },

    /// The subject does not own the referenced token.
    #[error("subject does not own token {0}")]
    NotTokenOwner(Word),

    /// The attestation has been revoked.
    #[error("attestation {0} has been revoked")]
    AttestationRevoked(Word),

    /// The attestation uses a different schema.
    #[error("attestation schema {0} is not the configured schema")]
    InvalidSchema(Word),

    /// The attestation was issued by an untrusted attester.
    #[error("attester {0} is not trusted")]
    AttesterNotTrusted(Address),

    /// The attestation was issued to someone else.
    #[error("attestation {0} was not issued to the subject")]
    NotYourAttestation(Word),

    /// The hat is not one of the criterion hats.
    #[error("hat {0} is not a criterion hat")]
    NotCriterionHat(Word),

    /// The subject does not wear the criterion hat.
    #[error("subject is not wearing hat {0}")]
    NotWearingCriterionHat(Word),

    /// The proof was generated for a different nullifier seed.
    #[error("nullifier seed {0} does not match the configured seed")]
    InvalidNullifierSeed(Word),

    /// The proof's signal is not the subject.
    #[error("signal {0} does not bind the subject")]
    InvalidSignal(Word),

    /// No verifier at this index.
    #[error("no verifier at index {0}")]
    VerifierNotFound(usize),

    /// A group id too wide to be bound into a proof scope.
    #[error("group id {0} does not fit in a proof scope")]
    GroupIdTooWide(Word),
}

impl From<VerifyError> for CheckerError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidProof(_) => Self::InvalidProof,
            VerifyError::NullifierAlreadySpent(n) => Self::AlreadySpentNullifier(n),
            other => Self::Proof(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_error_mapping() {
        let n = Word::from_u64(1);
        assert_eq!(
            CheckerError::from(VerifyError::NullifierAlreadySpent(n)),
            CheckerError::AlreadySpentNullifier(n)
        );
        assert_eq!(
            CheckerError::from(VerifyError::InvalidProof("x".into())),
            CheckerError::InvalidProof
        );
        assert!(matches!(
            CheckerError::from(VerifyError::GroupNotFound(n)),
            CheckerError::Proof(VerifyError::GroupNotFound(_))
        ));
    }

    #[test]
    fn test_registry_error_is_transparent() {
        let err = CheckerError::from(RegistryError::NonexistentToken(Word::from_u64(3)));
        assert_eq!(err.to_string(), format!("token {} does not exist", Word::from_u64(3)));
    }
}
