//! # Role Token Checker
//!
//! Evidence names one hat id. It must be one of the configured criterion
//! hats, and the subject must currently wear it.

use std::collections::BTreeSet;

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::abi::{decode, encode};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::HatsRegistry;
use crate::traits::Checker;

/// Encode a hat id as evidence.
pub fn hat_evidence(hat: Word) -> Vec<u8> {
    encode(&[Token::Uint(hat)])
}

/// Configuration: registry and the hats that grant access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatsConfig {
    /// Hats registry address.
    pub hats: Address,
    /// Hats that satisfy the check.
    pub criterion_hats: Vec<Word>,
}

impl AbiType for HatsConfig {
    fn param_types() -> Vec<ParamType> {
        vec![
            ParamType::Address,
            ParamType::Array(Box::new(ParamType::Uint)),
        ]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.hats),
            Token::uint_array(&self.criterion_hats),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            hats: t.address()?,
            criterion_hats: t.words()?,
        })
    }
}

/// Criterion-hat membership.
#[derive(Debug, Clone)]
pub struct HatsChecker {
    hats: Bound<dyn HatsRegistry>,
    criterion_hats: BTreeSet<Word>,
}

impl HatsChecker {
    /// A checker over `hats` accepting any of `criterion_hats`.
    pub fn new(hats: Bound<dyn HatsRegistry>, criterion_hats: impl IntoIterator<Item = Word>) -> Self {
        Self {
            hats,
            criterion_hats: criterion_hats.into_iter().collect(),
        }
    }

    /// Whether `hat` grants access.
    pub fn is_criterion_hat(&self, hat: &Word) -> bool {
        self.criterion_hats.contains(hat)
    }
}

impl Checker for HatsChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let hat = TokenStream::new(decode(&[ParamType::Uint], evidence)?).uint()?;
        if !self.is_criterion_hat(&hat) {
            return Err(CheckerError::NotCriterionHat(hat));
        }
        if !self.hats.is_wearer_of_hat(subject, &hat)? {
            return Err(CheckerError::NotWearingCriterionHat(hat));
        }
        Ok(true)
    }
}

impl Clonable for HatsChecker {
    const NAME: &'static str = "Hats";
    type Config = HatsConfig;
    type Bindings = Bound<dyn HatsRegistry>;
    type Error = CheckerError;

    fn initialize(config: HatsConfig, hats: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("hats", config.hats, hats.address())?;
        Ok(Self::new(hats, config.criterion_hats))
    }
}
