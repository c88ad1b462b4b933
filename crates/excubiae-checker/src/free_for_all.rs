//! # Free-for-All Checker
//!
//! Admits every subject. Replay protection still comes from the policy, so a
//! free-for-all policy lets each subject through exactly once.

use excubiae_clone::Clonable;
use excubiae_core::{AbiType, Address, CodecError, ParamType, Token};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::traits::Checker;

/// Configuration for logic that takes none. Encodes to zero bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoConfig;

impl AbiType for NoConfig {
    fn param_types() -> Vec<ParamType> {
        Vec::new()
    }

    fn to_tokens(&self) -> Vec<Token> {
        Vec::new()
    }

    fn from_tokens(_tokens: Vec<Token>) -> Result<Self, CodecError> {
        Ok(Self)
    }
}

/// Admits everyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeForAllChecker;

impl Checker for FreeForAllChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, _subject: &Address, _evidence: &[u8]) -> Result<bool, CheckerError> {
        Ok(true)
    }
}

impl Clonable for FreeForAllChecker {
    const NAME: &'static str = "FreeForAll";
    type Config = NoConfig;
    type Bindings = ();
    type Error = CheckerError;

    fn initialize(_config: NoConfig, _bindings: ()) -> Result<Self, CheckerError> {
        Ok(Self)
    }
}
