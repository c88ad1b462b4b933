//! # Attestation Checker
//!
//! Evidence is an attestation uid (`bytes32`). The attestation must be live,
//! issued by the trusted attester, conform to the configured schema, and
//! name the subject as recipient. Checks run in that order.

use excubiae_clone::{Clonable, FactoryError};
use excubiae_core::abi::{decode, encode};
use excubiae_core::{AbiType, Address, Bound, CodecError, ParamType, Token, TokenStream, Word};
use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::registry::AttestationRegistry;
use crate::traits::Checker;

/// Encode an attestation uid as evidence.
pub fn attestation_evidence(uid: Word) -> Vec<u8> {
    encode(&[Token::FixedBytes(uid)])
}

/// Configuration: registry, trusted attester, and schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasConfig {
    /// Attestation registry address.
    pub eas: Address,
    /// The only attester accepted.
    pub attester: Address,
    /// The only schema accepted.
    pub schema: Word,
}

impl AbiType for EasConfig {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Address, ParamType::Address, ParamType::FixedBytes]
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.eas),
            Token::Address(self.attester),
            Token::FixedBytes(self.schema),
        ]
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
        let mut t = TokenStream::new(tokens);
        Ok(Self {
            eas: t.address()?,
            attester: t.address()?,
            schema: t.bytes32()?,
        })
    }
}

/// Trusted-attester attestation check.
#[derive(Debug, Clone)]
pub struct EasChecker {
    eas: Bound<dyn AttestationRegistry>,
    attester: Address,
    schema: Word,
}

impl EasChecker {
    /// A checker over `eas`.
    pub fn new(eas: Bound<dyn AttestationRegistry>, attester: Address, schema: Word) -> Self {
        Self {
            eas,
            attester,
            schema,
        }
    }
}

impl Checker for EasChecker {
    fn trait_name(&self) -> &'static str {
        Self::NAME
    }

    fn check(&self, subject: &Address, evidence: &[u8]) -> Result<bool, CheckerError> {
        let uid = TokenStream::new(decode(&[ParamType::FixedBytes], evidence)?).bytes32()?;
        let attestation = self.eas.attestation(&uid)?;

        if attestation.is_revoked() {
            return Err(CheckerError::AttestationRevoked(uid));
        }
        if attestation.attester != self.attester {
            return Err(CheckerError::AttesterNotTrusted(attestation.attester));
        }
        if attestation.schema != self.schema {
            return Err(CheckerError::InvalidSchema(attestation.schema));
        }
        if attestation.recipient != *subject {
            return Err(CheckerError::NotYourAttestation(uid));
        }
        Ok(true)
    }
}

impl Clonable for EasChecker {
    const NAME: &'static str = "EAS";
    type Config = EasConfig;
    type Bindings = Bound<dyn AttestationRegistry>;
    type Error = CheckerError;

    fn initialize(config: EasConfig, eas: Self::Bindings) -> Result<Self, CheckerError> {
        FactoryError::ensure_bound("eas", config.eas, eas.address())?;
        Ok(Self::new(eas, config.attester, config.schema))
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::memory::InMemoryAttestations;
    use crate::registry::Attestation;
    use std::sync::Arc;

    struct Fixture {
        checker: EasChecker,
        store: Arc<InMemoryAttestations>,
        subject: Address,
        attester: Address,
        schema: Word,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryAttestations::new());
        let subject = Address::derive(b"subject");
        let attester = Address::derive(b"attester");
        let schema = Word::from_u64(7);
        let shared: Arc<dyn AttestationRegistry> = store.clone();
        let checker = EasChecker::new(Bound::new(Address::derive(b"eas"), shared), attester, schema);
        Fixture {
            checker,
            store,
            subject,
            attester,
            schema,
        }
    }

    fn attest(f: &Fixture, uid: u64, recipient: Address, attester: Address, schema: Word) -> Word {
        let uid = Word::from_u64(uid);
        f.store.attest(Attestation {
            uid,
            schema,
            recipient,
            attester,
            revocation_time: 0,
        });
        uid
    }

    #[test]
    fn test_valid_attestation_admitted() {
        let f = fixture();
        let uid = attest(&f, 1, f.subject, f.attester, f.schema);
        assert!(f.checker.check(&f.subject, &attestation_evidence(uid)).unwrap());
    }

    #[test]
    fn test_revoked_checked_first() {
        let f = fixture();
        // Wrong attester as well; revocation still wins.
        let uid = attest(&f, 1, f.subject, Address::derive(b"other"), f.schema);
        f.store.revoke(&uid, 100).unwrap();
        assert_eq!(
            f.checker.check(&f.subject, &attestation_evidence(uid)),
            Err(CheckerError::AttestationRevoked(uid))
        );
    }

    #[test]
    fn test_untrusted_attester() {
        let f = fixture();
        let rogue = Address::derive(b"rogue");
        let uid = attest(&f, 2, f.subject, rogue, f.schema);
        assert_eq!(
            f.checker.check(&f.subject, &attestation_evidence(uid)),
            Err(CheckerError::AttesterNotTrusted(rogue))
        );
    }

    #[test]
    fn test_wrong_schema() {
        let f = fixture();
        let other = Word::from_u64(8);
        let uid = attest(&f, 3, f.subject, f.attester, other);
        assert_eq!(
            f.checker.check(&f.subject, &attestation_evidence(uid)),
            Err(CheckerError::InvalidSchema(other))
        );
    }

    #[test]
    fn test_not_recipient() {
        let f = fixture();
        let uid = attest(&f, 4, Address::derive(b"someone"), f.attester, f.schema);
        assert_eq!(
            f.checker.check(&f.subject, &attestation_evidence(uid)),
            Err(CheckerError::NotYourAttestation(uid))
        );
    }

    #[test]
    fn test_unknown_uid_propagates() {
        let f = fixture();
        let uid = Word::from_u64(99);
        assert_eq!(
            f.checker.check(&f.subject, &attestation_evidence(uid)),
            Err(CheckerError::Registry(RegistryError::AttestationNotFound(uid)))
        );
    }
}
