//! # Audit Events
//!
//! Events are the externally observable record of every state change. Each
//! policy keeps its own append-only log, readable through `events()`.

use excubiae_core::{Address, Phase};
use serde::{Deserialize, Serialize};

/// A policy state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PolicyEvent {
    /// The target was set.
    TargetSet {
        /// The new target.
        target: Address,
    },
    /// A single-phase enforcement succeeded.
    Enforced {
        /// Who was admitted.
        subject: Address,
        /// The target that asked.
        target: Address,
        /// The evidence that was checked.
        evidence: Vec<u8>,
    },
    /// A three-phase enforcement succeeded.
    AdvancedEnforced {
        /// Who was admitted.
        subject: Address,
        /// The target that asked.
        target: Address,
        /// The evidence that was checked.
        evidence: Vec<u8>,
        /// Which phase.
        phase: Phase,
    },
}

/// A gate state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GateEvent {
    /// The gate was set.
    GateSet {
        /// The new gate.
        gate: Address,
    },
    /// A passerby passed.
    PassedGate {
        /// Who passed.
        passerby: Address,
        /// The gate they passed through.
        gate: Address,
    },
}
