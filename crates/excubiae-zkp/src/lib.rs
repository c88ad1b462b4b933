//! # excubiae-zkp — Zero-Knowledge Membership Proofs
//!
//! The proof side of the Semaphore checker.
//!
//! ## Architecture
//!
//! - **Proof** (`proof.rs`): `SemaphoreProof`, the evidence transcript
//!   (tree depth, tree root, nullifier, message, scope, eight proof points).
//!
//! - **Scope** (`scope.rs`): binds a proof to `(prover, group id)` so a proof
//!   generated for one context cannot be replayed in another.
//!
//! - **Nullifiers** (`nullifier.rs`): the consumed-at-most-once set.
//!
//! - **Traits** (`traits.rs`): `ProofVerifier` decides transcript validity;
//!   `GroupProofRegistry` is what checkers call into.
//!
//! - **Registry** (`registry.rs`): `GroupRegistry`, groups of identity
//!   commitments with root history, verifying and consuming nullifiers under
//!   a single lock.
//!
//! - **Mock** (`mock.rs`, feature `mock`): a per-nullifier validity table and
//!   a deterministic SHA-256 transcript verifier. Neither provides
//!   zero-knowledge; both satisfy the trait interface.
//!
//! ## Crate Policy
//!
//! - Depends on `excubiae-core` and `excubiae-crypto` internally.
//! - Nullifier consumption and proof verification happen under the same
//!   lock; there is no window in which two calls can both observe a
//!   nullifier as unspent.

#[cfg(feature = "mock")]
pub mod mock;
pub mod nullifier;
pub mod proof;
pub mod registry;
pub mod scope;
pub mod traits;

#[cfg(feature = "mock")]
pub use mock::{MockVerifier, TranscriptVerifier};
pub use nullifier::NullifierSet;
pub use proof::SemaphoreProof;
pub use registry::GroupRegistry;
pub use traits::{GroupProofRegistry, ProofVerifier, VerifyError};
