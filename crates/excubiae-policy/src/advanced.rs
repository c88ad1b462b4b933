//! # Three-Phase Policy
//!
//! ## State Machine
//!
//! Each `(target, subject)` carries an [`AdvancedRecord`]
//! `{ pre_done, main_count, post_done }`. The caller names the phase.
//! After the target check, phase preconditions run in this order:
//!
//! | Phase | Precondition (error) |
//! |-------|----------------------|
//! | `Pre` | not skipped (`PreCheckSkipped`); not done (`AlreadyEnforced`) |
//! | `Main` | pre done unless skipped (`PreCheckNotEnforced`); first main or repeats allowed (`MainCheckAlreadyEnforced`) |
//! | `Post` | not skipped (`PostCheckSkipped`); pre done unless skipped (`PreCheckNotEnforced`); main done (`MainCheckNotEnforced`); not done (`AlreadyEnforced`) |
//!
//! Only then is the checker consulted, with the phase passed through.
//!
//! ## Security Invariant
//!
//! The [`PhaseFlags`] are fixed at initialization, so every subject under
//! one policy sees the same phase semantics. Records only move forward:
//! flags go from `false` to `true`, and `main_count` never decreases.

use std::collections::BTreeMap;

use excubiae_checker::AdvancedCheckerHandle;
use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, CodecError, ParamType, Phase, Token, TokenStream};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::event::PolicyEvent;
use crate::target::TargetSlot;
use crate::traits::Policy;

/// Per-policy phase semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseFlags {
    /// Disable the pre-check. `Main` no longer requires it.
    pub skip_pre: bool,
    /// Disable the post-check.
    pub skip_post: bool,
    /// Allow `Main` to succeed more than once per subject.
    pub allow_multiple_main: bool,
}

/// Configuration for [`AdvancedPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedPolicyConfig {
    /// Administrator; the deployer.
    pub owner: Address,
    /// The three-phase checker this policy consults.
    pub checker: Address,
    /// Phase semantics.
    pub flags: PhaseFlags,
}

impl AbiType for AdvancedPolicyConfig {
    fn param_types() -> Vec<ParamType> {
        vec![
            ParamType::Address,
            ParamType::Address,
            ParamType::Bool,
            ParamType::Bool,
            ParamType::Bool,
        ]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.owner),
            Token::Address(self.checker),
            Token::Bool(self.flags.skip_pre),
            Token::Bool(self.flags.skip_post),
            Token::Bool(self.flags.allow_multiple_main),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            owner: t.address()?,
            checker: t.address()?,
            flags: PhaseFlags {
                skip_pre: t.boolean()?,
                skip_post: t.boolean()?,
                allow_multiple_main: t.boolean()?,
            },
        })
    }
}

/// Enforcement progress of one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedRecord {
    /// `Pre` succeeded.
    pub pre_done: bool,
    /// Number of successful `Main` calls.
    pub main_count: u64,
    /// `Post` succeeded.
    pub post_done: bool,
}

impl AdvancedRecord {
    /// Whether `phase` may run next under `flags`.
    pub fn admits(
        &self,
        flags: &PhaseFlags,
        subject: &Address,
        phase: Phase,
    ) -> Result<(), PolicyError> {
        let subject = *subject;
        let pre_missing = !flags.skip_pre && !self.pre_done;
        match phase {
            Phase::Pre => {
                if flags.skip_pre {
                    return Err(PolicyError::PreCheckSkipped);
                }
                if self.pre_done {
                    return Err(PolicyError::AlreadyEnforced { subject });
                }
            }
            Phase::Main => {
                if pre_missing {
                    return Err(PolicyError::PreCheckNotEnforced { subject });
                }
                if self.main_count > 0 && !flags.allow_multiple_main {
                    return Err(PolicyError::MainCheckAlreadyEnforced { subject });
                }
            }
            Phase::Post => {
                if flags.skip_post {
                    return Err(PolicyError::PostCheckSkipped);
                }
                if pre_missing {
                    return Err(PolicyError::PreCheckNotEnforced { subject });
                }
                if self.main_count == 0 {
                    return Err(PolicyError::MainCheckNotEnforced { subject });
                }
                if self.post_done {
                    return Err(PolicyError::AlreadyEnforced { subject });
                }
            }
        }
        Ok(())
    }

    fn advance(&mut self, phase: Phase) {
        match phase {
            Phase::Pre => self.pre_done = true,
            Phase::Main => self.main_count = self.main_count.saturating_add(1),
            Phase::Post => self.post_done = true,
        }
    }
}

/// Pre, main, and post checks with configurable skips and repeats.
#[derive(Debug)]
pub struct AdvancedPolicy {
    checker: AdvancedCheckerHandle,
    slot: TargetSlot,
    flags: PhaseFlags,
    records: BTreeMap<(Address, Address), AdvancedRecord>,
    events: Vec<PolicyEvent>,
}

impl AdvancedPolicy {
    /// A policy administered by `owner` consulting `checker`.
    pub fn new(owner: Address, checker: AdvancedCheckerHandle, flags: PhaseFlags) -> Self {
        Self {
            checker,
            slot: TargetSlot::new(owner),
            flags,
            records: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Address of the wrapped checker.
    pub fn checker(&self) -> Address {
        self.checker.address()
    }

    /// The phase semantics.
    pub fn flags(&self) -> PhaseFlags {
        self.flags
    }

    /// Enforce `phase` on `subject`. Target only.
    pub fn enforce(
        &mut self,
        caller: &Address,
        subject: &Address,
        evidence: &[u8],
        phase: Phase,
    ) -> Result<(), PolicyError> {
        let result = self.try_enforce(caller, subject, evidence, phase);
        if let Err(e) = &result {
            tracing::debug!(%caller, %subject, %phase, error = %e, "enforcement rejected");
        }
        result
    }

    fn try_enforce(
        &mut self,
        caller: &Address,
        subject: &Address,
        evidence: &[u8],
        phase: Phase,
    ) -> Result<(), PolicyError> {
        let target = self.slot.require_target(caller)?;
        self.enforced(&target, subject)
            .admits(&self.flags, subject, phase)?;
        if !self.checker.check(subject, evidence, phase)? {
            return Err(PolicyError::UnsuccessfulCheck { subject: *subject });
        }

        let record = self.records.entry((target, *subject)).or_default();
        record.advance(phase);
        let main_count = record.main_count;
        self.events.push(PolicyEvent::AdvancedEnforced {
            subject: *subject,
            target,
            evidence: evidence.to_vec(),
            phase,
        });
        tracing::info!(%subject, %target, %phase, main_count, "enforced");
        Ok(())
    }

    /// The record of `subject` under `target`; all-false if never enforced.
    pub fn enforced(&self, target: &Address, subject: &Address) -> AdvancedRecord {
        self.records
            .get(&(*target, *subject))
            .copied()
            .unwrap_or_default()
    }
}

impl Policy for AdvancedPolicy {
    fn trait_name(&self) -> &'static str {
        self.checker.trait_name()
    }

    fn owner(&self) -> Address {
        self.slot.owner()
    }

    fn target(&self) -> Option<Address> {
        self.slot.target()
    }

    fn set_target(&mut self, caller: &Address, target: Address) -> Result<(), PolicyError> {
        self.slot.set(caller, target)?;
        self.events.push(PolicyEvent::TargetSet { target });
        tracing::info!(%target, "target set");
        Ok(())
    }

    fn events(&self) -> &[PolicyEvent] {
        &self.events
    }
}

impl Clonable for AdvancedPolicy {
    const NAME: &'static str = "AdvancedPolicy";
    type Config = AdvancedPolicyConfig;
    type Bindings = AdvancedCheckerHandle;
    type Error = PolicyError;

    fn initialize(
        config: AdvancedPolicyConfig,
        checker: AdvancedCheckerHandle,
    ) -> Result<Self, PolicyError> {
        FactoryError::ensure_bound("checker", config.checker, checker.address())?;
        Ok(Self::new(config.owner, checker, config.flags))
    }
}
