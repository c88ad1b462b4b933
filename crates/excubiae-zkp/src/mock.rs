//! # Mock Verifiers
//!
//! Two deterministic, transparent verifiers for tests and local demos.
//!
//! - [`MockVerifier`] looks the nullifier up in a validity table, the way a
//!   stub proof contract is primed per test case.
//! - [`TranscriptVerifier`] accepts a proof iff its points are the SHA-256
//!   expansion of its public inputs. [`TranscriptVerifier::prove`] produces
//!   such proofs.
//!
//! ## Security Notice
//!
//! Neither verifier provides zero-knowledge or soundness against an
//! adversary who can compute SHA-256. They exist so the checker and policy
//! layers can be exercised end to end.

use std::collections::BTreeMap;

use excubiae_core::{Token, Word};
use excubiae_crypto::{sha256_tokens, sha256_word};

use crate::proof::{SemaphoreProof, PROOF_POINTS};
use crate::traits::{ProofVerifier, VerifyError};

/// Validity decided per nullifier. Unknown nullifiers are invalid.
#[derive(Debug, Clone, Default)]
pub struct MockVerifier {
    validity: BTreeMap<Word, bool>,
}

impl MockVerifier {
    /// A verifier that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept proofs carrying `nullifier`.
    pub fn with_valid(mut self, nullifier: Word) -> Self {
        self.validity.insert(nullifier, true);
        self
    }

    /// Reject proofs carrying `nullifier`.
    pub fn with_invalid(mut self, nullifier: Word) -> Self {
        self.validity.insert(nullifier, false);
        self
    }
}

impl ProofVerifier for MockVerifier {
    fn verify(&self, _group_id: &Word, proof: &SemaphoreProof) -> Result<bool, VerifyError> {
        Ok(self
            .validity
            .get(&proof.nullifier)
            .copied()
            .unwrap_or(false))
    }
}

/// Accepts proofs whose points commit to their own public inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptVerifier;

impl TranscriptVerifier {
    fn points(group_id: &Word, proof: &SemaphoreProof) -> [Word; PROOF_POINTS] {
        let mut inputs = vec![Token::Uint(*group_id)];
        inputs.extend(proof.public_inputs());
        let commitment = sha256_tokens(&inputs);
        let mut points = [Word::ZERO; PROOF_POINTS];
        for (i, point) in points.iter_mut().enumerate() {
            let mut buf = commitment.as_bytes().to_vec();
            buf.push(i as u8);
            *point = sha256_word(&buf);
        }
        points
    }

    /// Produce a proof that this verifier accepts.
    pub fn prove(
        group_id: &Word,
        merkle_tree_depth: u64,
        merkle_tree_root: Word,
        nullifier: Word,
        message: Word,
        scope: Word,
    ) -> SemaphoreProof {
        let mut proof = SemaphoreProof {
            merkle_tree_depth,
            merkle_tree_root,
            nullifier,
            message,
            scope,
            points: [Word::ZERO; PROOF_POINTS],
        };
        proof.points = Self::points(group_id, &proof);
        proof
    }
}

impl ProofVerifier for TranscriptVerifier {
    fn verify(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<bool, VerifyError> {
        Ok(proof.points == Self::points(group_id, proof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Word {
        Word::from_u64(1)
    }

    #[test]
    fn test_mock_table_lookup() {
        let verifier = MockVerifier::new()
            .with_valid(Word::from_u64(1))
            .with_invalid(Word::from_u64(2));
        let mut proof = TranscriptVerifier::prove(&group(), 1, Word::ZERO, Word::from_u64(1), Word::ZERO, Word::ZERO);
        assert!(verifier.verify(&group(), &proof).unwrap());
        proof.nullifier = Word::from_u64(2);
        assert!(!verifier.verify(&group(), &proof).unwrap());
        proof.nullifier = Word::from_u64(3);
        assert!(!verifier.verify(&group(), &proof).unwrap());
    }

    #[test]
    fn test_transcript_proof_verifies() {
        let proof = TranscriptVerifier::prove(&group(), 4, Word::from_u64(9), Word::from_u64(5), Word::ZERO, Word::from_u64(6));
        assert!(TranscriptVerifier.verify(&group(), &proof).unwrap());
    }

    #[test]
    fn test_transcript_binds_every_public_input() {
        let proof = TranscriptVerifier::prove(&group(), 4, Word::from_u64(9), Word::from_u64(5), Word::ZERO, Word::from_u64(6));

        let mut tampered = proof.clone();
        tampered.nullifier = Word::from_u64(50);
        assert!(!TranscriptVerifier.verify(&group(), &tampered).unwrap());

        let mut tampered = proof.clone();
        tampered.scope = Word::from_u64(60);
        assert!(!TranscriptVerifier.verify(&group(), &tampered).unwrap());

        assert!(!TranscriptVerifier.verify(&Word::from_u64(2), &proof).unwrap());
    }
}
