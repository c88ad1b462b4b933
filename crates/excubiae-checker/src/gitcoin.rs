//! # Reputation Score Checker
//!
//! Reads the subject's score from an oracle. Raw scores carry two decimal
//! places, so the score is divided by [`SCORE_FACTOR`] (integer division)
//! before it is compared with the passing score.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::ScoreOracle;
use crate::traits::Checker;

/// Divisor applied to raw oracle scores.
pub const SCORE_FACTOR: u128 = 100;

/// Configuration: oracle and passing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitcoinPassportConfig {
    /// Score oracle address.
    pub decoder: Address,
    /// Minimum scaled score.
    pub passing_score: Word,
}

impl AbiType for GitcoinPassportConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Uint]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.decoder), Token::Uint(self.passing_score)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            decoder: t.address()?,
            passing_score: t.uint()?,
        })
    }
}

/// Passing-score check.
#[derive(Debug, Clone)]
pub struct GitcoinPassportChecker {
    decoder: Bound<dyn ScoreOracle>,
    passing_score: u128,
}

impl GitcoinPassportChecker {
    /// A checker over `decoder`.
    pub fn new(decoder: Bound<dyn ScoreOracle>, passing_score: u128) -> Self {
        Self {
            decoder,
            passing_score,
        }
    }
}

impl Checker for GitcoinPassportChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, _evidence: &[u8]) -> Result<bool, CheckerError> {
        // Any raw score wider than u128 clears a u128 passing score.
        let Some(raw) = self.decoder.score(subject)?.to_u128() else {
            return Ok(true);
        };
        let score = raw / SCORE_FACTOR;
        if score < self.passing_score {
            return Err(CheckerError::ScoreTooLow {
                score,
                passing: self.passing_score,
            });
        }
        Ok(true)
    }
}

impl Clonable for GitcoinPassportChecker {
    const NAME: &'static str = "GitcoinPassport";
    type Config = GitcoinPassportConfig;
    type Bindings = Bound<dyn ScoreOracle>;
    type Error = CheckerError;

    fn initialize(
        config: GitcoinPassportConfig,
        decoder: Self::Bindings,
    ) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("decoder", config.decoder, decoder.address())?;
        Ok(Self::new(decoder, config.passing_score.try_to_u128()?))
    }
}
