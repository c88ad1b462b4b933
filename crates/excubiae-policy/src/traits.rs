//! # Policy Trait
//!
//! The administrative surface shared by every policy. Enforcement itself is
//! not part of the trait: single-phase and three-phase policies take
//! different arguments and keep different records.

use excubiae_core::Address;

use crate::error::PolicyError;
use crate::event::PolicyEvent;

/// A policy administered by an owner and driven by one target.
pub trait Policy {
    /// Family tag of the wrapped checker.
    fn trait_name(&self) -> &'static str;

    /// The administrator.
    fn owner(&self) -> Address;

    /// The target, once set.
    fn target(&self) -> Option<Address>;

    /// Set the target. Owner only, once, non-zero.
    fn set_target(&mut self, caller: &Address, target: Address) -> Result<(), PolicyError>;

    /// Every state change so far, oldest first.
    fn events(&self) -> &[PolicyEvent];
}
