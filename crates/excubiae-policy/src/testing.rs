//! Scripted checkers for policy unit tests.

use std::sync::Arc;

use excubiae_checker::{
    AdvancedChecker, AdvancedCheckerHandle, Checker, CheckerError, CheckerHandle,
};
use excubiae_core::{Address, Bound, Phase};

/// What a stub checker answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject,
    Fail,
}

impl Verdict {
    fn answer(self) -> Result<bool, CheckerError> {
        match self {
            Self::Admit => Ok(true),
            Self::Reject => Ok(false),
            Self::Fail => Err(CheckerError::InvalidProof),
        }
    }
}

/// Answers a fixed verdict per phase. Single-phase checks use the `Pre` slot.
#[derive(Debug)]
pub struct Stub {
    verdicts: [Verdict; 3],
}

impl Checker for Stub {
    fn trait_name(&self) -> &'static str {
        "Stub"
    }

    fn check(&self, _subject: &Address, _evidence: &[u8]) -> Result<bool, CheckerError> {
        self.verdicts[0].answer()
    }
}

impl AdvancedChecker for Stub {
    fn trait_name(&self) -> &'static str {
        "Stub"
    }

    fn check(
        &self,
        _subject: &Address,
        _evidence: &[u8],
        phase: Phase,
    ) -> Result<bool, CheckerError> {
        self.verdicts[usize::from(phase.as_u8())].answer()
    }
}

pub fn handle(verdict: Verdict) -> CheckerHandle {
    let stub: Arc<dyn Checker> = Arc::new(Stub {
        verdicts: [verdict; 3],
    });
    Bound::new(Address::derive(b"stub-checker"), stub)
}

pub fn advanced_handle(verdicts: [Verdict; 3]) -> AdvancedCheckerHandle {
    let stub: Arc<dyn AdvancedChecker> = Arc::new(Stub { verdicts });
    Bound::new(Address::derive(b"stub-advanced-checker"), stub)
}
