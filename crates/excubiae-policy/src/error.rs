//! # Error Types — Enforcement Failures
//!
//! Every failure aborts the call with no state change. A `false` verdict from
//! the checker becomes `UnsuccessfulCheck`; a checker *error* passes through
//! as [`PolicyError::Check`] so the caller can branch on the exact reason.

use excubiae_checker::CheckerError;
use excubiae_clone::FactoryError;
use excubiae_core::{Address, CodecError, Word};
use thiserror::Error;

/// Error from a policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// An administrative call from someone other than the owner.
    #[error("caller {caller} is not the owner {owner}")]
    Unauthorized {
        /// Who called.
        caller: Address,
        /// The policy owner.
        owner: Address,
    },

    /// The null address was supplied where a real one is required.
    #[error("zero address")]
    ZeroAddress,

    /// The target was already set.
    #[error("target already set to {0}")]
    TargetAlreadySet(Address),

    /// Enforcement from someone other than the target.
    #[error("caller {caller} is not the target")]
    TargetOnly {
        /// Who called.
        caller: Address,
    },

    /// The subject already passed this check.
    #[error("subject {subject} already enforced")]
    AlreadyEnforced {
        /// The subject.
        subject: Address,
    },

    /// The checker returned `false`.
    #[error("check failed for subject {subject}")]
    UnsuccessfulCheck {
        /// The subject.
        subject: Address,
    },

    /// This policy disables the pre-check.
    #[error("pre-check is skipped by this policy")]
    PreCheckSkipped,

    /// This policy disables the post-check.
    #[error("post-check is skipped by this policy")]
    PostCheckSkipped,

    /// Main or post attempted before a successful pre-check.
    #[error("pre-check not enforced for subject {subject}")]
    PreCheckNotEnforced {
        /// The subject.
        subject: Address,
    },

    /// Post attempted before any successful main check.
    #[error("main check not enforced for subject {subject}")]
    MainCheckNotEnforced {
        /// The subject.
        subject: Address,
    },

    /// A repeated main check on a policy that allows only one.
    #[error("main check already enforced for subject {subject}")]
    MainCheckAlreadyEnforced {
        /// The subject.
        subject: Address,
    },

    /// The evidence carries a nullifier this policy has already seen.
    #[error("nullifier {0} already spent")]
    AlreadySpentNullifier(Word),

    /// The evidence could not be decoded by the policy itself.
    #[error("malformed evidence: {0}")]
    Codec(#[from] CodecError),

    /// The checker failed structurally or with a named reason.
    #[error(transparent)]
    Check(#[from] CheckerError),

    /// Clone lifecycle failure.
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// Error from an [`Excubia`](crate::Excubia) gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// An administrative call from someone other than the owner.
    #[error("caller {caller} is not the owner {owner}")]
    Unauthorized {
        /// Who called.
        caller: Address,
        /// The gate owner.
        owner: Address,
    },

    /// The null address was supplied as the gate.
    #[error("zero address")]
    ZeroAddress,

    /// The gate was already set.
    #[error("gate already set to {0}")]
    GateAlreadySet(Address),

    /// `pass` from someone other than the gate.
    #[error("caller {caller} is not the gate")]
    GateOnly {
        /// Who called.
        caller: Address,
    },

    /// The passerby already passed.
    #[error("{passerby} already passed")]
    AlreadyPassed {
        /// The passerby.
        passerby: Address,
    },

    /// The checker returned `false`.
    #[error("check failed for passerby {passerby}")]
    UnsuccessfulCheck {
        /// The passerby.
        passerby: Address,
    },

    /// The checker failed structurally or with a named reason.
    #[error(transparent)]
    Check(#[from] CheckerError),

    /// Clone lifecycle failure.
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Any other failure of the underlying policy.
    #[error(transparent)]
    Policy(PolicyError),
}

impl From<PolicyError> for GateError {
    fn from(e: PolicyError) -> Self {
        match e {
            PolicyError::Unauthorized { caller, owner } => Self::Unauthorized { caller, owner },
            PolicyError::ZeroAddress => Self::ZeroAddress,
            PolicyError::TargetAlreadySet(gate) => Self::GateAlreadySet(gate),
            PolicyError::TargetOnly { caller } => Self::GateOnly { caller },
            PolicyError::AlreadyEnforced { subject } => Self::AlreadyPassed { passerby: subject },
            PolicyError::UnsuccessfulCheck { subject } => {
                Self::UnsuccessfulCheck { passerby: subject }
            }
            PolicyError::Check(e) => Self::Check(e),
            PolicyError::Factory(e) => Self::Factory(e),
            other => Self::Policy(other),
        }
    }
}
