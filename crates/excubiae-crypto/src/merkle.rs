//! # Sorted-Pair Merkle Tree
//!
//! Membership trees for the Merkle checker. Construction happens off-line
//! (allowlist tooling, tests); verification happens inside the checker.
//!
//! ## Algorithm
//!
//! - Leaf: `H(H(abi_encode(values)))`. The double hash keeps a leaf from
//!   ever colliding with a 64-byte internal node preimage.
//! - Node: `H(min(a, b) || max(a, b))`. Sorting the pair makes proofs
//!   position-free: a proof is just the ordered list of sibling hashes.
//! - Layout: leaves are sorted by hash and placed right-to-left at the end
//!   of a `2n - 1` node array; node `i` has children `2i + 1` and `2i + 2`;
//!   the root is node 0.
//!
//! `H` is SHA-256.
//!
//! ## Security Invariant
//!
//! [`MerkleTree::proof`] and [`verify_proof`] use the same [`leaf_hash`] and
//! [`hash_pair`]. Every proof the builder emits for a member verifies
//! against the builder's root.

use serde::{Deserialize, Serialize};

use excubiae_core::{Address, Token, Word};

use crate::error::CryptoError;
use crate::sha256::{sha256_tokens, sha256_word};

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Hash a leaf value tuple.
pub fn leaf_hash(values: &[Token]) -> Word {
    sha256_word(sha256_tokens(values).as_bytes())
}

/// Leaf hash of a single-address value, the layout allowlists use.
pub fn address_leaf(address: &Address) -> Word {
    leaf_hash(&[Token::Address(*address)])
}

/// Hash two nodes in sorted order.
pub fn hash_pair(a: &Word, b: &Word) -> Word {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_bytes());
    buf[32..].copy_from_slice(hi.as_bytes());
    sha256_word(&buf)
}

/// Fold a proof into the root it implies for `leaf`.
pub fn process_proof(leaf: Word, proof: &[Word]) -> Word {
    proof.iter().fold(leaf, |acc, sibling| hash_pair(&acc, sibling))
}

/// Whether `proof` proves `leaf` under `root`.
pub fn verify_proof(root: &Word, leaf: Word, proof: &[Word]) -> bool {
    process_proof(leaf, proof) == *root
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct LeafValue {
    value: Vec<Token>,
    tree_index: usize,
}

/// A complete sorted-pair Merkle tree over a list of value tuples.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    tree: Vec<Word>,
    values: Vec<LeafValue>,
}

/// Serializable snapshot of a tree: every node plus where each value's
/// leaf sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTreeDump {
    /// All nodes, root first.
    pub tree: Vec<Word>,
    /// Leaf hash and node index for each value, in insertion order.
    pub leaves: Vec<DumpLeaf>,
}

/// One value entry of a [`MerkleTreeDump`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpLeaf {
    /// The leaf hash.
    pub leaf: Word,
    /// Position of the leaf in the node array.
    pub tree_index: usize,
}

impl MerkleTree {
    /// Build a tree from value tuples. Order of `values` is preserved for
    /// index-based lookups; leaf placement is by sorted hash.
    pub fn of(values: Vec<Vec<Token>>) -> Result<Self, CryptoError> {
        if values.is_empty() {
            return Err(CryptoError::EmptyTree);
        }

        let mut hashed: Vec<(usize, Word)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i, leaf_hash(v)))
            .collect();
        hashed.sort_by(|a, b| a.1.cmp(&b.1));

        let n = hashed.len();
        let len = 2 * n - 1;
        let mut tree = vec![Word::ZERO; len];
        let mut positions = vec![0usize; n];
        for (rank, (value_index, leaf)) in hashed.iter().enumerate() {
            let tree_index = len - 1 - rank;
            tree[tree_index] = *leaf;
            positions[*value_index] = tree_index;
        }
        for i in (0..len - n).rev() {
            tree[i] = hash_pair(&tree[2 * i + 1], &tree[2 * i + 2]);
        }

        let values = values
            .into_iter()
            .zip(positions)
            .map(|(value, tree_index)| LeafValue { value, tree_index })
            .collect();
        Ok(Self { tree, values })
    }

    /// Build an allowlist tree with one address per leaf.
    pub fn of_addresses(addresses: &[Address]) -> Result<Self, CryptoError> {
        Self::of(addresses.iter().map(|a| vec![Token::Address(*a)]).collect())
    }

    /// The root.
    pub fn root(&self) -> Word {
        self.tree[0]
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value tuple at `index`.
    pub fn value(&self, index: usize) -> Result<&[Token], CryptoError> {
        self.entry(index).map(|e| e.value.as_slice())
    }

    /// The leaf hash of the value at `index`.
    pub fn leaf(&self, index: usize) -> Result<Word, CryptoError> {
        self.entry(index).map(|e| self.tree[e.tree_index])
    }

    fn entry(&self, index: usize) -> Result<&LeafValue, CryptoError> {
        self.values.get(index).ok_or(CryptoError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    /// Index of the first value equal to `value`.
    pub fn position(&self, value: &[Token]) -> Result<usize, CryptoError> {
        self.values
            .iter()
            .position(|v| v.value == value)
            .ok_or_else(|| CryptoError::LeafNotFound(leaf_hash(value)))
    }

    /// Sibling path for the value at `index`, leaf to root.
    pub fn proof_at(&self, index: usize) -> Result<Vec<Word>, CryptoError> {
        let mut node = self.entry(index)?.tree_index;
        let mut proof = Vec::new();
        while node > 0 {
            let sibling = if node % 2 == 1 { node + 1 } else { node - 1 };
            proof.push(self.tree[sibling]);
            node = (node - 1) / 2;
        }
        Ok(proof)
    }

    /// Sibling path for `value`.
    pub fn proof(&self, value: &[Token]) -> Result<Vec<Word>, CryptoError> {
        self.proof_at(self.position(value)?)
    }

    /// Sibling path for a single-address leaf.
    pub fn proof_for_address(&self, address: &Address) -> Result<Vec<Word>, CryptoError> {
        self.proof(&[Token::Address(*address)])
    }

    /// Verify `proof` for `value` against this tree's root.
    pub fn verify(&self, value: &[Token], proof: &[Word]) -> bool {
        verify_proof(&self.root(), leaf_hash(value), proof)
    }

    /// Snapshot for serialization.
    pub fn dump(&self) -> MerkleTreeDump {
        MerkleTreeDump {
            tree: self.tree.clone(),
            leaves: self
                .values
                .iter()
                .map(|v| DumpLeaf {
                    leaf: self.tree[v.tree_index],
                    tree_index: v.tree_index,
                })
                .collect(),
        }
    }
}

impl MerkleTreeDump {
    /// Recompute every internal node and return the root if the dump is
    /// self-consistent.
    pub fn validate(&self) -> Result<Word, CryptoError> {
        let n = self.leaves.len();
        if n == 0 {
            return Err(CryptoError::EmptyTree);
        }
        if self.tree.len() != 2 * n - 1 {
            return Err(CryptoError::MalformedDump(format!(
                "{} nodes for {} leaves",
                self.tree.len(),
                n
            )));
        }
        for entry in &self.leaves {
            if entry.tree_index < n - 1 || self.tree.get(entry.tree_index) != Some(&entry.leaf) {
                return Err(CryptoError::MalformedDump(format!(
                    "leaf {} not at node {}",
                    entry.leaf, entry.tree_index
                )));
            }
        }
        for i in 0..n - 1 {
            let expected = hash_pair(&self.tree[2 * i + 1], &self.tree[2 * i + 2]);
            if self.tree[i] != expected {
                return Err(CryptoError::MalformedDump(format!(
                    "node {i} does not hash its children"
                )));
            }
        }
        Ok(self.tree[0])
    }
}
