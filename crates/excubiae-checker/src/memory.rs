//! # In-Memory Registries
//!
//! Reference implementations of every registry capability, backed by
//! `parking_lot` locks so they can be shared behind `Arc` across checkers.
//! They model the externally observable behavior the checkers rely on and
//! nothing more.

use std::collections::{BTreeMap, BTreeSet};

use excubiae_core::{Address, Word};
use parking_lot::RwLock;

use crate::anon_aadhaar::AnonAadhaarProof;
use crate::error::RegistryError;
use crate::registry::{
    AadhaarVerifier, Attestation, AttestationRegistry, HatsRegistry, NftRegistry, ScoreOracle,
    TokenBalances, VotingPower,
};

// ---------------------------------------------------------------------------
// Non-fungible tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct NftState {
    owners: BTreeMap<Word, Address>,
    next_id: u64,
}

/// Sequentially minted non-fungible tokens, ids starting at 0.
#[derive(Debug, Default)]
pub struct InMemoryNft {
    state: RwLock<NftState>,
}

impl InMemoryNft {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id to `to` and return it.
    pub fn mint(&self, to: Address) -> Word {
        let mut state = self.state.write();
        let id = Word::from_u64(state.next_id);
        state.next_id += 1;
        state.owners.insert(id, to);
        id
    }

    /// Move `token_id` to `to`.
    pub fn transfer(&self, token_id: &Word, to: Address) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let owner = state
            .owners
            .get_mut(token_id)
            .ok_or(RegistryError::NonexistentToken(*token_id))?;
        *owner = to;
        Ok(())
    }

    /// Destroy `token_id`.
    pub fn burn(&self, token_id: &Word) -> Result<(), RegistryError> {
        self.state
            .write()
            .owners
            .remove(token_id)
            .map(|_| ())
            .ok_or(RegistryError::NonexistentToken(*token_id))
    }
}

impl NftRegistry for InMemoryNft {
    fn owner_of(&self, token_id: &Word) -> Result<Address, RegistryError> {
        self.state
            .read()
            .owners
            .get(token_id)
            .copied()
            .ok_or(RegistryError::NonexistentToken(*token_id))
    }

    fn balance_of(&self, owner: &Address) -> Result<Word, RegistryError> {
        let count = self
            .state
            .read()
            .owners
            .values()
            .filter(|o| *o == owner)
            .count();
        Ok(Word::from_u64(count as u64))
    }
}

// ---------------------------------------------------------------------------
// Fungible tokens and voting power
// ---------------------------------------------------------------------------

/// Fungible balances plus voting-power checkpoints.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    balances: RwLock<BTreeMap<Address, u128>>,
    checkpoints: RwLock<BTreeMap<Address, BTreeMap<u64, u128>>>,
}

impl InMemoryToken {
    /// No balances, no checkpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `to`.
    pub fn mint(&self, to: Address, amount: u128) {
        let mut balances = self.balances.write();
        let entry = balances.entry(to).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Record that `account` held `votes` from `timepoint` on.
    pub fn checkpoint(&self, account: Address, timepoint: u64, votes: u128) {
        self.checkpoints
            .write()
            .entry(account)
            .or_default()
            .insert(timepoint, votes);
    }
}

impl TokenBalances for InMemoryToken {
    fn balance_of(&self, owner: &Address) -> Result<Word, RegistryError> {
        let balance = self.balances.read().get(owner).copied().unwrap_or(0);
        Ok(Word::from_u128(balance))
    }
}

impl VotingPower for InMemoryToken {
    fn past_votes(&self, account: &Address, timepoint: u64) -> Result<Word, RegistryError> {
        let votes = self
            .checkpoints
            .read()
            .get(account)
            .and_then(|history| history.range(..=timepoint).next_back().map(|(_, v)| *v))
            .unwrap_or(0);
        Ok(Word::from_u128(votes))
    }
}

// ---------------------------------------------------------------------------
// Attestations
// ---------------------------------------------------------------------------

/// Attestations keyed by uid.
#[derive(Debug, Default)]
pub struct InMemoryAttestations {
    records: RwLock<BTreeMap<Word, Attestation>>,
}

impl InMemoryAttestations {
    /// No attestations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an attestation, replacing any with the same uid.
    pub fn attest(&self, attestation: Attestation) {
        self.records.write().insert(attestation.uid, attestation);
    }

    /// Mark `uid` revoked at `time`.
    pub fn revoke(&self, uid: &Word, time: u64) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(uid)
            .ok_or(RegistryError::AttestationNotFound(*uid))?;
        record.revocation_time = time;
        Ok(())
    }
}

impl AttestationRegistry for InMemoryAttestations {
    fn attestation(&self, uid: &Word) -> Result<Attestation, RegistryError> {
        self.records
            .read()
            .get(uid)
            .cloned()
            .ok_or(RegistryError::AttestationNotFound(*uid))
    }
}

// ---------------------------------------------------------------------------
// Scores and hats
// ---------------------------------------------------------------------------

/// Raw scores; unknown subjects score zero.
#[derive(Debug, Default)]
pub struct InMemoryScores {
    scores: RwLock<BTreeMap<Address, Word>>,
}

impl InMemoryScores {
    /// No scores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw score of `subject`.
    pub fn set_score(&self, subject: Address, score: Word) {
        self.scores.write().insert(subject, score);
    }
}

impl ScoreOracle for InMemoryScores {
    fn score(&self, subject: &Address) -> Result<Word, RegistryError> {
        Ok(self.scores.read().get(subject).copied().unwrap_or(Word::ZERO))
    }
}

/// Hat assignments.
#[derive(Debug, Default)]
pub struct InMemoryHats {
    worn: RwLock<BTreeSet<(Address, Word)>>,
}

impl InMemoryHats {
    /// Nobody wears anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `hat` on `wearer`.
    pub fn give(&self, wearer: Address, hat: Word) {
        self.worn.write().insert((wearer, hat));
    }

    /// Take `hat` off `wearer`.
    pub fn take(&self, wearer: &Address, hat: &Word) {
        self.worn.write().remove(&(*wearer, *hat));
    }
}

impl HatsRegistry for InMemoryHats {
    fn is_wearer_of_hat(&self, wearer: &Address, hat: &Word) -> Result<bool, RegistryError> {
        Ok(self.worn.read().contains(&(*wearer, *hat)))
    }
}

// ---------------------------------------------------------------------------
// Identity proofs
// ---------------------------------------------------------------------------

/// Accepts or rejects every proof, switchable at runtime.
#[derive(Debug)]
pub struct FixedAadhaarVerifier {
    accept: RwLock<bool>,
}

impl FixedAadhaarVerifier {
    /// A verifier answering `accept`.
    pub fn new(accept: bool) -> Self {
        Self {
            accept: RwLock::new(accept),
        }
    }

    /// Change the answer.
    pub fn set_accept(&self, accept: bool) {
        *self.accept.write() = accept;
    }
}

impl AadhaarVerifier for FixedAadhaarVerifier {
    fn verify_proof(&self, _proof: &AnonAadhaarProof) -> Result<bool, RegistryError> {
        Ok(*self.accept.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nft_ownership() {
        let nft = InMemoryNft::new();
        let alice = Address::derive(b"alice");
        let id = nft.mint(alice);
        assert_eq!(id, Word::ZERO);
        assert_eq!(nft.owner_of(&id).unwrap(), alice);
        assert_eq!(nft.balance_of(&alice).unwrap(), Word::from_u64(1));
        assert_eq!(
            nft.owner_of(&Word::from_u64(1)),
            Err(RegistryError::NonexistentToken(Word::from_u64(1)))
        );
        nft.burn(&id).unwrap();
        assert_eq!(nft.balance_of(&alice).unwrap(), Word::ZERO);
    }

    #[test]
    fn test_vote_checkpoints() {
        let token = InMemoryToken::new();
        let alice = Address::derive(b"alice");
        token.checkpoint(alice, 10, 5);
        token.checkpoint(alice, 20, 1);
        assert_eq!(token.past_votes(&alice, 9).unwrap(), Word::ZERO);
        assert_eq!(token.past_votes(&alice, 15).unwrap(), Word::from_u64(5));
        assert_eq!(token.past_votes(&alice, 20).unwrap(), Word::from_u64(1));
    }

    #[test]
    fn test_attestation_revocation() {
        let registry = InMemoryAttestations::new();
        let uid = Word::from_u64(1);
        registry.attest(Attestation {
            uid,
            schema: Word::from_u64(2),
            recipient: Address::derive(b"r"),
            attester: Address::derive(b"a"),
            revocation_time: 0,
        });
        assert!(!registry.attestation(&uid).unwrap().is_revoked());
        registry.revoke(&uid, 100).unwrap();
        assert!(registry.attestation(&uid).unwrap().is_revoked());
        assert!(registry.revoke(&Word::from_u64(9), 1).is_err());
    }

    #[test]
    fn test_hats() {
        let hats = InMemoryHats::new();
        let alice = Address::derive(b"alice");
        hats.give(alice, Word::from_u64(7));
        assert!(hats.is_wearer_of_hat(&alice, &Word::from_u64(7)).unwrap());
        hats.take(&alice, &Word::from_u64(7));
        assert!(!hats.is_wearer_of_hat(&alice, &Word::from_u64(7)).unwrap());
    }
}
