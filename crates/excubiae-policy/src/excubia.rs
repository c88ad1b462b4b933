//! # Excubia Gate
//!
//! The gate is a single-phase policy with binary pass semantics. It wraps a
//! [`BasePolicy`] whose target is the gate, and renames the outcomes:
//! `TargetOnly` becomes `GateOnly`, `AlreadyEnforced` becomes
//! `AlreadyPassed`, `TargetAlreadySet` becomes `GateAlreadySet`.
//!
//! `check` is a preview that never touches gate state. `pass` is the
//! state-changing call and is restricted to the gate.

use excubiae_checker::CheckerHandle;
use excubiae_clone::Clonable;
use excubiae_core::Address;

use crate::base::{BasePolicy, BasePolicyConfig};
use crate::error::GateError;
use crate::event::GateEvent;
use crate::traits::Policy;

/// A one-pass-per-passerby gate.
#[derive(Debug)]
pub struct Excubia {
    base: BasePolicy,
    events: Vec<GateEvent>,
}

impl Excubia {
    /// A gate administered by `owner` consulting `checker`.
    pub fn new(owner: Address, checker: CheckerHandle) -> Self {
        Self {
            base: BasePolicy::new(owner, checker),
            events: Vec::new(),
        }
    }

    /// Family tag of the wrapped checker.
    pub fn trait_name(&self) -> &'static str {
        self.base.trait_name()
    }

    /// The administrator.
    pub fn owner(&self) -> Address {
        self.base.owner()
    }

    /// The gate, once set.
    pub fn gate(&self) -> Option<Address> {
        self.base.target()
    }

    /// Set the gate. Owner only, once, non-zero.
    pub fn set_gate(&mut self, caller: &Address, gate: Address) -> Result<(), GateError> {
        self.base.set_target(caller, gate)?;
        self.events.push(GateEvent::GateSet { gate });
        Ok(())
    }

    /// Ask the checker without recording or consuming anything.
    pub fn check(&self, passerby: &Address, evidence: &[u8]) -> Result<bool, GateError> {
        Ok(self.base.checker_handle().preview(passerby, evidence)?)
    }

    /// Let `passerby` through. Gate only, once per passerby.
    pub fn pass(
        &mut self,
        caller: &Address,
        passerby: &Address,
        evidence: &[u8],
    ) -> Result<(), GateError> {
        self.base.enforce(caller, passerby, evidence)?;
        self.events.push(GateEvent::PassedGate {
            passerby: *passerby,
            gate: *caller,
        });
        Ok(())
    }

    /// Whether `passerby` has passed.
    pub fn passed_passersby(&self, passerby: &Address) -> bool {
        self.gate()
            .is_some_and(|gate| self.base.enforced(&gate, passerby))
    }

    /// Every gate state change so far, oldest first.
    pub fn events(&self) -> &[GateEvent] {
        &self.events
    }
}

impl Clonable for Excubia {
    const NAME: &'static str = "Excubia";
    type Config = BasePolicyConfig;
    type Bindings = CheckerHandle;
    type Error = GateError;

    fn initialize(config: BasePolicyConfig, checker: CheckerHandle) -> Result<Self, GateError> {
        let base = BasePolicy::initialize(config, checker)?;
        Ok(Self {
            base,
            events: Vec::new(),
        })
    }
}
