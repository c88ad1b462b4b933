//! # Fungible Balance Checkers
//!
//! Admit subjects whose balance, current ([`Erc20Checker`]) or at a
//! snapshot ([`Erc20VotesChecker`]), meets a threshold. Evidence is ignored.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::{TokenBalances, VotingPower};
use crate::traits::Checker;

fn require_threshold(balance: Word, threshold: Word) -> Result<bool, CheckerError> {
    if balance < threshold {
        return Err(CheckerError::BalanceTooLow { balance, threshold });
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Current balance
// ---------------------------------------------------------------------------

/// Configuration: token and minimum balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Config {
    /// Token address.
    pub token: Address,
    /// Minimum balance.
    pub threshold: Word,
}

impl AbiType for Erc20Config {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Uint]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.token), Token::Uint(self.threshold)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            token: t.address()?,
            threshold: t.uint()?,
        })
    }
}

/// Current balance at or above a threshold.
#[derive(Debug, Clone)]
pub struct Erc20Checker {
    token: Bound<dyn TokenBalances>,
    threshold: Word,
}

impl Erc20Checker {
    /// A checker over `token`.
    pub fn new(token: Bound<dyn TokenBalances>, threshold: Word) -> Self {
        Self { token, threshold }
    }
}

impl Checker for Erc20Checker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, _evidence: &[u8]) -> Result<bool, CheckerError> {
        require_threshold(self.token.balance_of(subject)?, self.threshold)
    }
}

impl Clonable for Erc20Checker {
    const NAME: &'static str = "ERC20";
    type Config = Erc20Config;
    type Bindings = Bound<dyn TokenBalances>;
    type Error = CheckerError;

    fn initialize(config: Erc20Config, token: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("token", config.token, token.address())?;
        Ok(Self::new(token, config.threshold))
    }
}

// ---------------------------------------------------------------------------
// Snapshot voting power
// ---------------------------------------------------------------------------

/// Configuration: token, snapshot, and minimum voting power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20VotesConfig {
    /// Token address.
    pub token: Address,
    /// Timepoint voting power is read at.
    pub snapshot_block: u64,
    /// Minimum voting power.
    pub threshold: Word,
}

impl AbiType for Erc20VotesConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Uint, ParamType::Uint]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.token),
            Token::uint(self.snapshot_block),
            Token::Uint(self.threshold),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        let token = t.address()?;
        let snapshot = t.uint()?;
        Ok(Self {
            token,
            snapshot_block: snapshot
                .to_u64()
                .ok_or_else(|| CodecError::Overflow(snapshot.to_string()))?,
            threshold: t.uint()?,
        })
    }
}

/// Voting power at a snapshot at or above a threshold.
#[derive(Debug, Clone)]
pub struct Erc20VotesChecker {
    token: Bound<dyn VotingPower>,
    snapshot_block: u64,
    threshold: Word,
}

impl Erc20VotesChecker {
    /// A checker over `token` at `snapshot_block`.
    pub fn new(token: Bound<dyn VotingPower>, snapshot_block: u64, threshold: Word) -> Self {
        Self {
            token,
            snapshot_block,
            threshold,
        }
    }
}

impl Checker for Erc20VotesChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, _evidence: &[u8]) -> Result<bool, CheckerError> {
        let votes = self.token.past_votes(subject, self.snapshot_block)?;
        require_threshold(votes, self.threshold)
    }
}

impl Clonable for Erc20VotesChecker {
    const NAME: &'static str = "ERC20Votes";
    type Config = Erc20VotesConfig;
    type Bindings = Bound<dyn VotingPower>;
    type Error = CheckerError;

    fn initialize(config: Erc20VotesConfig, token: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("token", config.token, token.address())?;
        Ok(Self::new(token, config.snapshot_block, config.threshold))
    }
}
