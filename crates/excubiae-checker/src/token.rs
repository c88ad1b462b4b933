//! # Token Ownership Checker
//!
//! Like the base non-fungible checker, but a non-owner is a named failure
//! (`NotTokenOwner`) rather than a `false` verdict.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream};
use serde::{Deserialize, Serialize};

use crate::erc721::decode_token_id;
use crate::error::CheckerError;
use crate::registry::NftRegistry;
use crate::traits::Checker;

/// Configuration: the token collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Collection address.
    pub token: Address,
}

impl AbiType for TokenConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Address(self.token)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self { token: t.address()? })
    }
}

/// Strict token ownership.
#[derive(Debug, Clone)]
pub struct TokenChecker {
    token: Bound<dyn NftRegistry>,
}

impl TokenChecker {
    /// A checker over `token`.
    pub fn new(token: Bound<dyn NftRegistry>) -> Self {
        Self { token }
    }
}

impl Checker for TokenChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let token_id = decode_token_id(evidence)?;
        if self.token.owner_of(&token_id)? != *subject {
            return Err(CheckerError::NotTokenOwner(token_id));
        }
        Ok(true)
    }
}

impl Clonable for TokenChecker {
    const NAME: &'static str = "Token";
    type Config = TokenConfig;
    type Bindings = Bound<dyn NftRegistry>;
    type Error = CheckerError;

    fn initialize(config: TokenConfig, token: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("token", config.token, token.address())?;
        Ok(Self::new(token))
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::erc721::token_evidence;
    use crate::memory::InMemoryNft;
    use excubiae_core::Word;
    use std::sync::Arc;

    #[test]
    fn test_owner_admitted_non_owner_fails() {
        let nft = Arc::new(InMemoryNft::new());
        let owner = Address::derive(b"owner");
        let id = nft.mint(owner);
        let shared: Arc<dyn NftRegistry> = nft;
        let checker = TokenChecker::new(Bound::new(Address::derive(b"token"), shared));

        assert!(checker.check(&owner, &token_evidence(id)).unwrap());
        assert_eq!(
            checker.check(&Address::derive(b"thief"), &token_evidence(id)),
            Err(CheckerError::NotTokenOwner(id))
        );
        assert!(matches!(
            checker.check(&owner, &token_evidence(Word::from_u64(99))),
            Err(CheckerError::Registry(_))
        ));
    }
}
