//! # Single-Phase Policy
//!
//! ## State Machine
//!
//! ```text
//! (target, subject): Unenforced ──enforce──▶ Enforced (terminal)
//! ```
//!
//! `enforce(caller, subject, evidence)` succeeds iff, in this order:
//!
//! 1. `caller` is the target (`TargetOnly`);
//! 2. the subject is not yet enforced for this target (`AlreadyEnforced`);
//! 3. the checker returns `true` (`UnsuccessfulCheck`). Checker errors
//!    propagate unchanged.
//!
//! ## Security Invariant
//!
//! A failed call changes nothing. Records only move from unenforced to
//! enforced and are never cleared.

use std::collections::BTreeSet;

use excubiae_checker::CheckerHandle;
use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, CodecError, ParamType, Token, TokenStream};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::event::PolicyEvent;
use crate::target::TargetSlot;
use crate::traits::Policy;

/// Configuration shared by single-phase policies and the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePolicyConfig {
    /// Administrator; the deployer.
    pub owner: Address,
    /// The checker this policy consults.
    pub checker: Address,
}

impl AbiType for BasePolicyConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Address]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.owner), Token::Address(self.checker)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            owner: t.address()?,
            checker: t.address()?,
        })
    }
}

/// One check, one record per `(target, subject)`.
#[derive(Debug)]
pub struct BasePolicy {
    checker: CheckerHandle,
    slot: TargetSlot,
    enforced: BTreeSet<(Address, Address)>,
    events: Vec<PolicyEvent>,
}

impl BasePolicy {
    /// A policy administered by `owner` consulting `checker`.
    pub fn new(owner: Address, checker: CheckerHandle) -> Self {
        Self {
            checker,
            slot: TargetSlot::new(owner),
            enforced: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Address of the wrapped checker.
    pub fn checker(&self) -> Address {
        self.checker.address()
    }

    /// Enforce the check on `subject`. Target only, once per subject.
    pub fn enforce(
        &mut self,
        caller: &Address,
        subject: &Address,
        evidence: &[u8],
    ) -> Result<(), PolicyError> {
        let result = self.try_enforce(caller, subject, evidence);
        if let Err(e) = &result {
            tracing::debug!(%caller, %subject, error = %e, "enforcement rejected");
        }
        result
    }

    fn try_enforce(
        &mut self,
        caller: &Address,
        subject: &Address,
        evidence: &[u8],
    ) -> Result<(), PolicyError> {
        let target = self.slot.require_target(caller)?;
        if self.enforced(&target, subject) {
            return Err(PolicyError::AlreadyEnforced { subject: *subject });
        }
        self.admit(target, subject, evidence)
    }

    /// Run the checker and, on `true`, record and announce the enforcement.
    /// Replay is the caller's concern.
    pub(crate) fn admit(
        &mut self,
        target: Address,
        subject: &Address,
        evidence: &[u8],
    ) -> Result<(), PolicyError> {
        if !self.checker.check(subject, evidence)? {
            return Err(PolicyError::UnsuccessfulCheck { subject: *subject });
        }
        self.enforced.insert((target, *subject));
        self.events.push(PolicyEvent::Enforced {
            subject: *subject,
            target,
            evidence: evidence.to_vec(),
        });
        tracing::info!(%subject, %target, checker = self.checker.trait_name(), "enforced");
        Ok(())
    }

    /// Whether `subject` has been enforced for `target`.
    pub fn enforced(&self, target: &Address, subject: &Address) -> bool {
        self.enforced.contains(&(*target, *subject))
    }

    pub(crate) fn checker_handle(&self) -> &CheckerHandle {
        &self.checker
    }

    /// `caller` if it is the target.
    pub(crate) fn require_target(&self, caller: &Address) -> Result<Address, PolicyError> {
        self.slot.require_target(caller)
    }
}

impl Policy for BasePolicy {
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

impl Clonable for BasePolicy {
    const NAME: &'static str = "BasePolicy";
    type Config = BasePolicyConfig;
    type Bindings = CheckerHandle;
    type Error = PolicyError;

    fn initialize(config: BasePolicyConfig, checker: CheckerHandle) -> Result<Self, PolicyError> {
        FactoryError::ensure_bound("checker", config.checker, checker.address())?;
        Ok(Self::new(config.owner, checker))
    }
}
