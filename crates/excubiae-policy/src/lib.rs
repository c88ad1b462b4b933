//! # excubiae-policy — Enforcement State Machines
//!
//! A policy stands between a consumer application (the *target*) and a
//! checker. The target calls `enforce`; the policy confirms the caller,
//! checks replay and phase preconditions, consults the checker, records
//! the outcome, and emits an event.
//!
//! ## Architecture
//!
//! - **Base** (`base.rs`): single-phase policy, one record per
//!   `(target, subject)`.
//! - **Advanced** (`advanced.rs`): three-phase policy (`Pre`, `Main`,
//!   `Post`) with per-policy skip and repeat flags.
//! - **Semaphore** (`semaphore.rs`): single-phase policy keyed by proof
//!   nullifier.
//! - **Excubia** (`excubia.rs`): the gate, a base policy with binary
//!   passed/not-passed semantics and its own error names.
//! - **Target** (`target.rs`): owner-guarded one-time target slot.
//! - **Events** (`event.rs`): the audit trail.
//!
//! Every policy is `Clonable`. Deployed clones are reached through
//! `Instance::logic_mut`, which fails until initialization has run.
//!
//! ## Security Invariant
//!
//! - Only the target can enforce; only the owner can set the target, once.
//! - Every failure leaves records and events untouched.
//! - Records only progress forward.

pub mod advanced;
pub mod base;
pub mod error;
pub mod event;
pub mod excubia;
pub mod semaphore;
pub mod target;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use advanced::{AdvancedPolicy, AdvancedPolicyConfig, AdvancedRecord, PhaseFlags};
pub use base::{BasePolicy, BasePolicyConfig};
pub use error::{GateError, PolicyError};
pub use event::{GateEvent, PolicyEvent};
pub use excubia::Excubia;
pub use semaphore::SemaphorePolicy;
pub use target::TargetSlot;
pub use traits::Policy;
