//! # Group Registry
//!
//! Groups of identity commitments, each with the history of roots it has
//! had. A proof is accepted against any historical root of its group, so a
//! member who generated a proof before a later addition can still use it.
//!
//! ## Security Invariant
//!
//! `validate_proof` takes the registry lock once and holds it across the
//! nullifier check, the verifier call, and the nullifier insert.

use std::collections::BTreeMap;

use excubiae_core::{Token, Word};
use excubiae_crypto::MerkleTree;
use parking_lot::Mutex;

use crate::nullifier::NullifierSet;
use crate::proof::SemaphoreProof;
use crate::traits::{GroupProofRegistry, ProofVerifier, VerifyError};

/// Deepest tree a proof may claim.
pub const MAX_DEPTH: u64 = 32;

#[derive(Debug, Clone, Default)]
struct Group {
    members: Vec<Word>,
    roots: Vec<Word>,
}

impl Group {
    fn knows_root(&self, root: &Word) -> bool {
        self.roots.contains(root)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    groups: BTreeMap<Word, Group>,
    nullifiers: NullifierSet,
}

/// Proving groups plus the shared nullifier set.
#[derive(Debug)]
pub struct GroupRegistry<V> {
    verifier: V,
    state: Mutex<RegistryState>,
}

impl<V: ProofVerifier> GroupRegistry<V> {
    /// An empty registry backed by `verifier`.
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Create an empty group.
    pub fn create_group(&self, group_id: Word) -> Result<(), VerifyError> {
        let mut state = self.state.lock();
        if state.groups.contains_key(&group_id) {
            return Err(VerifyError::GroupAlreadyExists(group_id));
        }
        state.groups.insert(group_id, Group::default());
        Ok(())
    }

    /// Add identity commitments and record the resulting root. Returns the
    /// new root.
    pub fn add_members(&self, group_id: &Word, commitments: &[Word]) -> Result<Word, VerifyError> {
        let mut state = self.state.lock();
        let group = state
            .groups
            .get_mut(group_id)
            .ok_or(VerifyError::GroupNotFound(*group_id))?;
        group.members.extend_from_slice(commitments);
        let leaves = group.members.iter().map(|c| vec![Token::Uint(*c)]).collect();
        let root = MerkleTree::of(leaves)
            .map_err(|_| VerifyError::EmptyGroup(*group_id))?
            .root();
        group.roots.push(root);
        Ok(root)
    }

    /// Record an externally computed root for a group.
    pub fn push_root(&self, group_id: &Word, root: Word) -> Result<(), VerifyError> {
        let mut state = self.state.lock();
        let group = state
            .groups
            .get_mut(group_id)
            .ok_or(VerifyError::GroupNotFound(*group_id))?;
        group.roots.push(root);
        Ok(())
    }

    /// The most recent root of a group, if it has one.
    pub fn current_root(&self, group_id: &Word) -> Result<Option<Word>, VerifyError> {
        let state = self.state.lock();
        let group = state
            .groups
            .get(group_id)
            .ok_or(VerifyError::GroupNotFound(*group_id))?;
        Ok(group.roots.last().copied())
    }

    /// Number of commitments in a group.
    pub fn member_count(&self, group_id: &Word) -> Result<usize, VerifyError> {
        let state = self.state.lock();
        state
            .groups
            .get(group_id)
            .map(|g| g.members.len())
            .ok_or(VerifyError::GroupNotFound(*group_id))
    }

    /// The backing verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    fn check_structure(
        state: &RegistryState,
        group_id: &Word,
        proof: &SemaphoreProof,
    ) -> Result<(), VerifyError> {
        let group = state
            .groups
            .get(group_id)
            .ok_or(VerifyError::GroupNotFound(*group_id))?;
        if proof.merkle_tree_depth == 0 || proof.merkle_tree_depth > MAX_DEPTH {
            return Err(VerifyError::UnsupportedDepth(proof.merkle_tree_depth));
        }
        if !group.knows_root(&proof.merkle_tree_root) {
            return Err(VerifyError::UnknownRoot {
                group: *group_id,
                root: proof.merkle_tree_root,
            });
        }
        Ok(())
    }
}

impl<V: ProofVerifier> GroupProofRegistry for GroupRegistry<V> {
    fn verify_proof(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<bool, VerifyError> {
        let state = self.state.lock();
        Self::check_structure(&state, group_id, proof)?;
        self.verifier.verify(group_id, proof)
    }

    fn validate_proof(&self, group_id: &Word, proof: &SemaphoreProof) -> Result<(), VerifyError> {
        let mut state = self.state.lock();
        Self::check_structure(&state, group_id, proof)?;
        state.nullifiers.ensure_unspent(&proof.nullifier)?;
        if !self.verifier.verify(group_id, proof)? {
            return Err(VerifyError::InvalidProof(format!(
                "transcript for nullifier {} does not verify",
                proof.nullifier
            )));
        }
        state.nullifiers.consume(proof.nullifier)?;
        tracing::debug!(group = %group_id, nullifier = %proof.nullifier, "nullifier consumed");
        Ok(())
    }

    fn is_spent(&self, nullifier: &Word) -> bool {
        self.state.lock().nullifiers.is_spent(nullifier)
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::mock::{MockVerifier, TranscriptVerifier};
    use crate::proof::PROOF_POINTS;
    use std::sync::Arc;

    fn group() -> Word {
        Word::from_u64(1)
    }

    fn registry_with(verifier: MockVerifier) -> (GroupRegistry<MockVerifier>, Word) {
        let registry = GroupRegistry::new(verifier);
        registry.create_group(group()).unwrap();
        let root = registry
            .add_members(&group(), &[Word::from_u64(100), Word::from_u64(200)])
            .unwrap();
        (registry, root)
    }

    fn proof(root: Word, nullifier: u64) -> SemaphoreProof {
        SemaphoreProof {
            merkle_tree_depth: 2,
            merkle_tree_root: root,
            nullifier: Word::from_u64(nullifier),
            message: Word::ZERO,
            scope: Word::ZERO,
            points: [Word::ZERO; PROOF_POINTS],
        }
    }

    // ── Group management ──────────────────────────────────────────────

    #[test]
    fn test_duplicate_group_rejected() {
        let (registry, _) = registry_with(MockVerifier::new());
        assert_eq!(
            registry.create_group(group()),
            Err(VerifyError::GroupAlreadyExists(group()))
        );
    }

    #[test]
    fn test_roots_accumulate() {
        let (registry, first) = registry_with(MockVerifier::new());
        let second = registry.add_members(&group(), &[Word::from_u64(300)]).unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.current_root(&group()).unwrap(), Some(second));
        assert_eq!(registry.member_count(&group()).unwrap(), 3);
    }

    // ── Validation ────────────────────────────────────────────────────

    #[test]
    fn test_validate_consumes_nullifier_once() {
        let (registry, root) = registry_with(MockVerifier::new().with_valid(Word::from_u64(7)));
        let p = proof(root, 7);
        registry.validate_proof(&group(), &p).unwrap();
        assert!(registry.is_spent(&p.nullifier));
        assert_eq!(
            registry.validate_proof(&group(), &p),
            Err(VerifyError::NullifierAlreadySpent(p.nullifier))
        );
    }

    #[test]
    fn test_invalid_proof_consumes_nothing() {
        let (registry, root) = registry_with(MockVerifier::new().with_invalid(Word::from_u64(8)));
        let p = proof(root, 8);
        assert!(matches!(
            registry.validate_proof(&group(), &p),
            Err(VerifyError::InvalidProof(_))
        ));
        assert!(!registry.is_spent(&p.nullifier));
    }

    #[test]
    fn test_old_root_still_accepted() {
        let (registry, old_root) = registry_with(MockVerifier::new().with_valid(Word::from_u64(1)));
        registry.add_members(&group(), &[Word::from_u64(999)]).unwrap();
        assert!(registry.verify_proof(&group(), &proof(old_root, 1)).unwrap());
    }

    #[test]
    fn test_structural_rejections() {
        let (registry, root) = registry_with(MockVerifier::new().with_valid(Word::from_u64(1)));
        assert_eq!(
            registry.verify_proof(&Word::from_u64(42), &proof(root, 1)),
            Err(VerifyError::GroupNotFound(Word::from_u64(42)))
        );
        let mut deep = proof(root, 1);
        deep.merkle_tree_depth = 33;
        assert_eq!(
            registry.verify_proof(&group(), &deep),
            Err(VerifyError::UnsupportedDepth(33))
        );
        let stranger = proof(Word::from_u64(5), 1);
        assert!(matches!(
            registry.verify_proof(&group(), &stranger),
            Err(VerifyError::UnknownRoot { .. })
        ));
    }

    #[test]
    fn test_verify_is_read_only() {
        let (registry, root) = registry_with(MockVerifier::new().with_valid(Word::from_u64(3)));
        let p = proof(root, 3);
        assert!(registry.verify_proof(&group(), &p).unwrap());
        assert!(registry.verify_proof(&group(), &p).unwrap());
        assert!(!registry.is_spent(&p.nullifier));
    }

    #[test]
    fn test_concurrent_validation_consumes_once() {
        let registry = Arc::new(GroupRegistry::new(TranscriptVerifier));
        registry.create_group(group()).unwrap();
        let root = registry.add_members(&group(), &[Word::from_u64(1)]).unwrap();
        let p = TranscriptVerifier::prove(&group(), 1, root, Word::from_u64(77), Word::ZERO, Word::ZERO);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let p = p.clone();
                std::thread::spawn(move || registry.validate_proof(&group(), &p).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }
}
