//! # excubiae-crypto — Cryptographic Primitives
//!
//! Provides the hashing building blocks for Excubiae:
//!
//! - **SHA-256** over raw bytes and over ABI-encoded tuples, producing `Word`s.
//! - **Sorted-pair Merkle tree** for membership checkers: off-chain
//!   construction, proof extraction, and the verification routine the
//!   Merkle checker runs at enforcement time.
//!
//! ## Crate Policy
//!
//! - Depends only on `excubiae-core` internally.
//! - Tree construction and proof verification share the same leaf and node
//!   hashing functions; there is no second implementation to drift.

pub mod error;
pub mod merkle;
pub mod sha256;

pub use error::CryptoError;
pub use merkle::{
    address_leaf, hash_pair, leaf_hash, process_proof, verify_proof, MerkleTree, MerkleTreeDump,
};
pub use sha256::{sha256_tokens, sha256_word};
