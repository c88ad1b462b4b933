//! # excubiae-checker — Verification Predicates
//!
//! Checkers decide whether a subject is admissible given evidence. They are
//! stateless with respect to enforcement: replay protection belongs to the
//! policy in front of them. The one exception is the Semaphore checker,
//! whose proof registry consumes nullifiers.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): `Checker` and `AdvancedChecker`, plus the
//!   addressed handles policies hold.
//!
//! - **Registries** (`registry.rs`): narrow capability traits for the
//!   external state checkers consult (token ownership, balances, voting
//!   power, attestations, scores, hats, identity-document proofs).
//!
//! - **Checkers**, one module per family:
//!
//!   | Module | Checker | Phases |
//!   |--------|---------|--------|
//!   | `free_for_all` | `FreeForAllChecker` | single |
//!   | `merkle` | `MerkleProofChecker` | single |
//!   | `semaphore` | `SemaphoreChecker` | single |
//!   | `erc721` | `BaseErc721Checker`, `AdvancedErc721Checker` | single, three |
//!   | `erc20` | `Erc20Checker`, `Erc20VotesChecker` | single |
//!   | `token` | `TokenChecker` | single |
//!   | `eas` | `EasChecker` | single |
//!   | `gitcoin` | `GitcoinPassportChecker` | single |
//!   | `hats` | `HatsChecker` | single |
//!   | `anon_aadhaar` | `AnonAadhaarChecker` | single |
//!
//! - **Memory** (`memory.rs`, feature `memory`): in-memory registries for
//!   tests and local demos.
//!
//! ## Crate Policy
//!
//! - Every checker is `Clonable`: deployed through a factory with its
//!   configuration as appended bytes, initialized exactly once.
//! - Collaborator addresses in the configuration must match the bound
//!   capabilities at initialization.
//! - External registry errors propagate; they are never turned into a
//!   rejection.

pub mod anon_aadhaar;
pub mod eas;
pub mod erc20;
pub mod erc721;
pub mod error;
pub mod free_for_all;
pub mod gitcoin;
pub mod hats;
#[cfg(feature = "memory")]
pub mod memory;
pub mod merkle;
pub mod registry;
pub mod semaphore;
pub mod token;
pub mod traits;

pub use anon_aadhaar::{AnonAadhaarChecker, AnonAadhaarConfig, AnonAadhaarProof};
pub use eas::{EasChecker, EasConfig};
pub use erc20::{Erc20Checker, Erc20Config, Erc20VotesChecker, Erc20VotesConfig};
pub use erc721::{
    AdvancedErc721Bindings, AdvancedErc721Checker, AdvancedErc721Config, BaseErc721Checker,
    BaseErc721Config,
};
pub use error::{CheckerError, RegistryError};
pub use free_for_all::{FreeForAllChecker, NoConfig};
pub use gitcoin::{GitcoinPassportChecker, GitcoinPassportConfig};
pub use hats::{HatsChecker, HatsConfig};
pub use merkle::{MerkleProofChecker, MerkleProofConfig};
pub use registry::{
    AadhaarVerifier, Attestation, AttestationRegistry, HatsRegistry, NftRegistry, ScoreOracle,
    TokenBalances, VotingPower,
};
pub use semaphore::{SemaphoreChecker, SemaphoreConfig};
pub use token::{TokenChecker, TokenConfig};
pub use traits::{
    AdvancedChecker, AdvancedCheckerHandle, Checker, CheckerHandle, IntoAdvancedCheckerHandle,
    IntoCheckerHandle,
};
