//! # Non-Fungible Token Checkers
//!
//! - [`BaseErc721Checker`]: single-phase, admits the owner of the token id
//!   given as evidence.
//! - [`AdvancedErc721Checker`]: three-phase. `Pre` delegates to a base
//!   checker (owns a signup token), `Main` requires a minimum signup
//!   balance, `Post` admits subjects holding no reward token yet whose
//!   evidence token id falls in a configured range.
//!
//! A token id that does not exist is a registry error, not a rejection.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::abi::{decode, encode};
use excubiae_core::{
    AbiType, Address, Bound, CodecError, ParamType, Phase, Token, TokenStream, Word,
};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::NftRegistry;
use crate::traits::{AdvancedChecker, Checker, CheckerHandle};

/// Encode a token id as evidence.
pub fn token_evidence(token_id: Word) -> Vec<u8> {
    encode(&[Token::Uint(token_id)])
}

pub(crate) fn decode_token_id(evidence: &[u8]) -> Result<Word, CheckerError> {
    let tokens = decode(&[ParamType::Uint], evidence)?;
    Ok(TokenStream::new(tokens).uint()?)
}

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Configuration: the token collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseErc721Config {
    /// Address of the collection.
    pub nft: Address,
}

impl AbiType for BaseErc721Config {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.nft)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self { nft: t.address()? })
    }
}

/// Token ownership.
#[derive(Debug, Clone)]
pub struct BaseErc721Checker {
    nft: Bound<dyn NftRegistry>,
}

impl BaseErc721Checker {
    /// A checker over `nft`.
    pub fn new(nft: Bound<dyn NftRegistry>) -> Self {
        Self { nft }
    }
}

impl Checker for BaseErc721Checker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let token_id = decode_token_id(evidence)?;
        Ok(self.nft.owner_of(&token_id)? == *subject)
    }
}

impl Clonable for BaseErc721Checker {
    const NAME: &'static str = "BaseERC721";
    type Config = BaseErc721Config;
    type Bindings = Bound<dyn NftRegistry>;
    type Error = CheckerError;

    fn initialize(config: BaseErc721Config, nft: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("nft", config.nft, nft.address())?;
        Ok(Self::new(nft))
    }
}

// ---------------------------------------------------------------------------
// Advanced
// ---------------------------------------------------------------------------

/// Configuration for the three-phase token checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedErc721Config {
    /// Collection whose tokens grant signup.
    pub signup_nft: Address,
    /// Collection whose tokens mark a subject as already rewarded.
    pub reward_nft: Address,
    /// Base checker consulted in the `Pre` phase.
    pub base_checker: Address,
    /// Minimum signup balance for `Main`.
    pub min_balance: Word,
    /// Lowest token id accepted in `Post`.
    pub min_token_id: Word,
    /// Highest token id accepted in `Post`.
    pub max_token_id: Word,
}

impl AbiType for AdvancedErc721Config {
    fn param_types() -> Vec<ParamType> {
        vec![
            ParamType::Address,
            ParamType::Address,
            ParamType::Address,
            ParamType::Uint,
            ParamType::Uint,
            ParamType::Uint,
        ]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.signup_nft),
            Token::Address(self.reward_nft),
            Token::Address(self.base_checker),
            Token::Uint(self.min_balance),
            Token::Uint(self.min_token_id),
            Token::Uint(self.max_token_id),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            signup_nft: t.address()?,
            reward_nft: t.address()?,
            base_checker: t.address()?,
            min_balance: t.uint()?,
            min_token_id: t.uint()?,
            max_token_id: t.uint()?,
        })
    }
}

/// Live collaborators of the three-phase token checker.
#[derive(Debug, Clone)]
pub struct AdvancedErc721Bindings {
    /// Signup collection.
    pub signup_nft: Bound<dyn NftRegistry>,
    /// Reward collection.
    pub reward_nft: Bound<dyn NftRegistry>,
    /// Pre-phase checker.
    pub base_checker: CheckerHandle,
}

/// Three-phase token checker.
#[derive(Debug, Clone)]
pub struct AdvancedErc721Checker {
    bindings: AdvancedErc721Bindings,
    min_balance: Word,
    min_token_id: Word,
    max_token_id: Word,
}

impl AdvancedErc721Checker {
    /// Address of the `index`-th collaborator, in the order signup
    /// collection, reward collection, base checker.
    pub fn verifier_at(&self, index: usize) -> Result<Address, CheckerError> {
        match index {
            0 => Ok(self.bindings.signup_nft.address()),
            1 => Ok(self.bindings.reward_nft.address()),
            2 => Ok(self.bindings.base_checker.address()),
            _ => Err(CheckerError::VerifierNotFound(index)),
        }
    }
}

impl AdvancedChecker for AdvancedErc721Checker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8], phase: Phase) -> Result<bool, CheckerError> {
        match phase {
            Phase::Pre => self.bindings.base_checker.check(subject, evidence),
            Phase::Main => {
                let balance = self.bindings.signup_nft.balance_of(subject)?;
                Ok(balance >= self.min_balance)
            }
            Phase::Post => {
                if !self.bindings.reward_nft.balance_of(subject)?.is_zero() {
                    return Ok(false);
                }
                let token_id = decode_token_id(evidence)?;
                Ok(token_id >= self.min_token_id && token_id <= self.max_token_id)
            }
        }
    }
}

impl Clonable for AdvancedErc721Checker {
    const NAME: &'static str = "AdvancedERC721";
    type Config = AdvancedErc721Config;
    type Bindings = AdvancedErc721Bindings;
    type Error = CheckerError;

    fn initialize(config: AdvancedErc721Config, bindings: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("signup nft", config.signup_nft, bindings.signup_nft.address())?;
        FactoryError::ensure_bound("reward nft", config.reward_nft, bindings.reward_nft.address())?;
        FactoryError::ensure_bound(
            "base checker",
            config.base_checker,
            bindings.base_checker.address(),
        )?;
        Ok(Self {
            bindings,
            min_balance: config.min_balance,
            min_token_id: config.min_token_id,
            max_token_id: config.max_token_id,
        })
    }
}
