//! # Checker Traits
//!
//! A checker is a predicate over `(subject, evidence)`. Single-phase
//! policies hold a [`CheckerHandle`]; three-phase policies hold an
//! [`AdvancedCheckerHandle`] and pass the phase through.
//!
//! ## Security Invariant
//!
//! Checkers take `&self`. They never see who is calling them, so the only
//! access control in front of a checker is the policy that owns it.

use std::sync::Arc;

use excubiae_clone::{Clonable, Instance};
use excubiae_core::{Address, Bound, Phase};

use crate::error::CheckerError;

/// A single-phase admissibility predicate.
pub trait Checker: Send + Sync {
    /// Family tag, reported by policies as their trait.
    fn trait_name(&self) -> &'static str;

    /// `Ok(true)` admits, `Ok(false)` rejects, `Err` aborts.
    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError>;

    /// The verdict `check` would reach, without consuming anything.
    ///
    /// Checkers whose `check` has side effects (spending a nullifier)
    /// must override this. For everyone else the two are the same call.
    fn preview(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        self.check(subject, evidence)
    }
}

/// A phase-aware admissibility predicate.
pub trait AdvancedChecker: Send + Sync {
    /// Family tag, reported by policies as their trait.
    fn trait_name(&self) -> &'static str;

    /// `Ok(true)` admits, `Ok(false)` rejects, `Err` aborts.
    fn check(&self, subject: &Address, evidence: &[u8], phase: Phase) -> Result<bool, CheckerError>;
}

/// An addressed single-phase checker.
pub type CheckerHandle = Bound<dyn Checker>;

/// An addressed three-phase checker.
pub type AdvancedCheckerHandle = Bound<dyn AdvancedChecker>;

impl<L> Checker for Instance<L>
where
    L: Clonable + Checker,
    L::Bindings: Send + Sync,
{
    fn trait_name(&self) -> &'static str {
        L::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        self.logic()?.check(subject, evidence)
    }

    fn preview(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        self.logic()?.preview(subject, evidence)
    }
}

impl<L> AdvancedChecker for Instance<L>
where
    L: Clonable + AdvancedChecker,
    L::Bindings: Send + Sync,
{
    fn trait_name(&self) -> &'static str {
        L::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8], phase: Phase) -> Result<bool, CheckerError> {
        self.logic()?.check(subject, evidence, phase)
    }
}

/// Turn a deployed checker into a shareable handle at its clone address.
pub trait IntoCheckerHandle {
    /// Wrap as a [`CheckerHandle`].
    fn into_handle(self) -> CheckerHandle;
}

/// Turn a deployed three-phase checker into a shareable handle.
pub trait IntoAdvancedCheckerHandle {
    /// Wrap as an [`AdvancedCheckerHandle`].
    fn into_advanced_handle(self) -> AdvancedCheckerHandle;
}

impl<L> IntoCheckerHandle for Instance<L>
where
    L: Clonable + Checker + 'static,
    L::Bindings: Send + Sync + 'static,
{
    fn into_handle(self) -> CheckerHandle {
        let address = self.address();
        let checker: Arc<dyn Checker> = Arc::new(self);
        Bound::new(address, checker)
    }
}

impl<L> IntoAdvancedCheckerHandle for Instance<L>
where
    L: Clonable + AdvancedChecker + 'static,
    L::Bindings: Send + Sync + 'static,
{
    fn into_advanced_handle(self) -> AdvancedCheckerHandle {
        let address = self.address();
        let checker: Arc<dyn AdvancedChecker> = Arc::new(self);
        Bound::new(address, checker)
    }
}
