//! # Semaphore Policy
//!
//! A single-phase policy whose replay protection is keyed by nullifier
//! rather than by subject. The nullifier is read from the evidence before
//! the checker runs; a nullifier this policy has already accepted fails
//! with `AlreadySpentNullifier` without consulting the checker.
//!
//! A subject may be enforced again with a fresh proof. `enforced(target,
//! subject)` reports whether it ever succeeded.

use std::collections::BTreeSet;

use excubiae_checker::semaphore::evidence_nullifier;
use excubiae_checker::CheckerHandle;
use excubiae_clone::Clonable;
use excubiae_core::{Address, Word};

use crate::base::{BasePolicy, BasePolicyConfig};
use crate::error::PolicyError;
use crate::event::PolicyEvent;
use crate::traits::Policy;

/// Nullifier-keyed single-phase policy.
#[derive(Debug)]
pub struct SemaphorePolicy {
    base: BasePolicy,
    spent: BTreeSet<Word>,
}

impl SemaphorePolicy {
    /// A policy administered by `owner` consulting `checker`.
    pub fn new(owner: Address, checker: CheckerHandle) -> Self {
        Self {
            base: BasePolicy::new(owner, checker),
            spent: BTreeSet::new(),
        }
    }

    /// Address of the wrapped checker.
    pub fn checker(&self) -> Address {
        self.base.checker()
    }

    /// Enforce on `subject` with a proof whose nullifier is unspent here.
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
        let target = self.base.require_target(caller)?;
        let nullifier = evidence_nullifier(evidence)?;
        if self.spent.contains(&nullifier) {
            return Err(PolicyError::AlreadySpentNullifier(nullifier));
        }
        self.base.admit(target, subject, evidence)?;
        self.spent.insert(nullifier);
        tracing::debug!(%nullifier, "nullifier spent");
        Ok(())
    }

    /// Whether `subject` was ever enforced for `target`.
    pub fn enforced(&self, target: &Address, subject: &Address) -> bool {
        self.base.enforced(target, subject)
    }

    /// Whether this policy has accepted `nullifier`.
    pub fn spent_nullifier(&self, nullifier: &Word) -> bool {
        self.spent.contains(nullifier)
    }
}

impl Policy for SemaphorePolicy {
    fn trait_name(&self) -> &'static str {
        self.base.trait_name()
    }

    fn owner(&self) -> Address {
        self.base.owner()
    }

    fn target(&self) -> Option<Address> {
        self.base.target()
    }

    fn set_target(&mut self, caller: &Address, target: Address) -> Result<(), PolicyError> {
        self.base.set_target(caller, target)
    }

    fn events(&self) -> &[PolicyEvent] {
        self.base.events()
    }
}

impl Clonable for SemaphorePolicy {
    const NAME: &'static str = "SemaphorePolicy";
    type Config = BasePolicyConfig;
    type Bindings = CheckerHandle;
    type Error = PolicyError;

    fn initialize(config: BasePolicyConfig, checker: CheckerHandle) -> Result<Self, PolicyError> {
        let base = BasePolicy::initialize(config, checker)?;
        Ok(Self {
            base,
            spent: BTreeSet::new(),
        })
    }
}
