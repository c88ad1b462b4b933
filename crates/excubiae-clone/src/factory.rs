//! # Factory
//!
//! A factory stamps out clones of one logic type. Each clone's address is
//! the first 20 bytes of `SHA-256("excubiae.clone" || factory || nonce)`,
//! so two clones of the same factory never share an address even when
//! their configuration is identical.
//!
//! Every committed clone leaves a [`CloneRecord`] and a [`CloneDeployed`]
//! event. The event log is the audit trail of what the factory created.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use excubiae_core::{AbiType, Address};

use crate::instance::{Clonable, Instance};

/// Emitted for every clone a factory commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneDeployed {
    /// The new clone's address.
    pub clone: Address,
}

/// Registry entry for one clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRecord {
    /// The creating factory.
    pub factory: Address,
    /// The clone.
    pub clone: Address,
    /// Configuration bytes appended at creation.
    pub appended: Vec<u8>,
}

/// Deploys clones of `L`.
#[derive(Debug)]
pub struct Factory<L: Clonable> {
    address: Address,
    nonce: u64,
    records: Vec<CloneRecord>,
    events: Vec<CloneDeployed>,
    _logic: PhantomData<fn() -> L>,
}

impl<L: Clonable> Factory<L> {
    /// A factory at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            nonce: 0,
            records: Vec::new(),
            events: Vec::new(),
            _logic: PhantomData,
        }
    }

    /// A factory at the address derived from the logic's family tag.
    pub fn for_logic() -> Self {
        Self::new(Address::derive(format!("excubiae.factory.{}", L::NAME).as_bytes()))
    }

    /// This factory's address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn next_address(&self) -> Address {
        let mut label = b"excubiae.clone".to_vec();
        label.extend_from_slice(self.address.as_bytes());
        label.extend_from_slice(&self.nonce.to_be_bytes());
        Address::derive(&label)
    }

    fn spawn(&self, config: &L::Config, bindings: L::Bindings) -> Instance<L> {
        Instance::new(self.next_address(), self.address, config.abi_encode(), bindings)
    }

    fn commit(&mut self, instance: &Instance<L>) {
        self.nonce += 1;
        self.records.push(CloneRecord {
            factory: self.address,
            clone: instance.address(),
            appended: instance.appended_bytes().to_vec(),
        });
        self.events.push(CloneDeployed {
            clone: instance.address(),
        });
        tracing::info!(
            factory = %self.address,
            clone = %instance.address(),
            kind = L::NAME,
            "clone deployed"
        );
    }

    /// Create and commit a clone without initializing it.
    pub fn create_clone(&mut self, config: &L::Config, bindings: L::Bindings) -> Instance<L> {
        let instance = self.spawn(config, bindings);
        self.commit(&instance);
        instance
    }

    /// Create a clone, initialize it, and commit it. Nothing is committed if
    /// initialization fails.
    pub fn deploy(&mut self, config: L::Config, bindings: L::Bindings) -> Result<Instance<L>, L::Error> {
        let mut instance = self.spawn(&config, bindings);
        instance.initialize()?;
        self.commit(&instance);
        Ok(instance)
    }

    /// Every committed clone, oldest first.
    pub fn records(&self) -> &[CloneRecord] {
        &self.records
    }

    /// The record for `clone`, if this factory created it.
    pub fn record(&self, clone: &Address) -> Option<&CloneRecord> {
        self.records.iter().find(|r| r.clone == *clone)
    }

    /// Creation events, oldest first.
    pub fn events(&self) -> &[CloneDeployed] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactoryError;
    use excubiae_core::{CodecError, ParamType, Token, TokenStream, Word};

    // ── A minimal clonable ────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct AllowanceConfig {
        owner: Address,
        limit: Word,
    }

    impl AbiType for AllowanceConfig {
        fn param_types() -> Vec<ParamType> {
            vec![ParamType::Address, ParamType::Uint]
        }

        fn to_tokens(&self) -> Vec<Token> {
            vec![Token::Address(self.owner), Token::Uint(self.limit)]
        }

        fn from_tokens(tokens: Vec<Token>) -> Result<Self, CodecError> {
            let mut t = TokenStream::new(tokens);
            Ok(Self {
                owner: t.address()?,
                limit: t.uint()?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    enum AllowanceError {
        Factory(FactoryError),
        ZeroLimit,
    }

    impl From<FactoryError> for AllowanceError {
        fn from(e: FactoryError) -> Self {
            Self::Factory(e)
        }
    }

    #[derive(Debug)]
    struct Allowance {
        owner: Address,
        limit: Word,
    }

    impl Clonable for Allowance {
        const NAME: &'static str = "Allowance";
        type Config = AllowanceConfig;
        type Bindings = ();
        type Error = AllowanceError;

        fn initialize(config: AllowanceConfig, _bindings: ()) -> Result<Self, AllowanceError> {
            if config.limit.is_zero() {
                return Err(AllowanceError::ZeroLimit);
            }
            Ok(Self {
                owner: config.owner,
                limit: config.limit,
            })
        }
    }

    fn config(limit: u64) -> AllowanceConfig {
        AllowanceConfig {
            owner: Address::derive(b"deployer"),
            limit: Word::from_u64(limit),
        }
    }

    // ── Deployment ────────────────────────────────────────────────────

    #[test]
    fn test_deploy_initializes_and_emits() {
        let mut factory = Factory::<Allowance>::for_logic();
        let instance = factory.deploy(config(5), ()).unwrap();
        assert!(instance.initialized());
        assert_eq!(instance.factory(), factory.address());
        assert_eq!(factory.events(), &[CloneDeployed { clone: instance.address() }]);
        assert_eq!(instance.logic().unwrap().limit, Word::from_u64(5));
        assert_eq!(instance.logic().unwrap().owner, Address::derive(b"deployer"));
    }

    #[test]
    fn test_appended_bytes_are_encoded_config() {
        let mut factory = Factory::<Allowance>::for_logic();
        let instance = factory.deploy(config(5), ()).unwrap();
        assert_eq!(instance.appended_bytes(), config(5).abi_encode().as_slice());
        assert_eq!(instance.config().unwrap(), config(5));
        let record = factory.record(&instance.address()).unwrap();
        assert_eq!(record.appended, config(5).abi_encode());
        assert_eq!(record.factory, factory.address());
    }

    #[test]
    fn test_second_initialize_fails() {
        let mut factory = Factory::<Allowance>::for_logic();
        let mut instance = factory.deploy(config(5), ()).unwrap();
        assert_eq!(
            instance.initialize(),
            Err(AllowanceError::Factory(FactoryError::AlreadyInitialized(instance.address())))
        );
        assert_eq!(instance.logic().unwrap().limit, Word::from_u64(5));
    }

    #[test]
    fn test_clones_get_distinct_addresses() {
        let mut factory = Factory::<Allowance>::for_logic();
        let a = factory.deploy(config(5), ()).unwrap();
        let b = factory.deploy(config(5), ()).unwrap();
        assert_ne!(a.address(), b.address());
        assert_eq!(factory.records().len(), 2);
    }

    #[test]
    fn test_failed_initialize_commits_nothing() {
        let mut factory = Factory::<Allowance>::for_logic();
        assert_eq!(factory.deploy(config(0), ()).unwrap_err(), AllowanceError::ZeroLimit);
        assert!(factory.events().is_empty());
        assert!(factory.records().is_empty());
    }

    // ── Two-step creation ─────────────────────────────────────────────

    #[test]
    fn test_uninitialized_clone_refuses_use() {
        let mut factory = Factory::<Allowance>::for_logic();
        let mut instance = factory.create_clone(&config(3), ());
        assert!(!instance.initialized());
        assert_eq!(
            instance.logic().unwrap_err(),
            FactoryError::NotInitialized(instance.address())
        );
        instance.initialize().unwrap();
        assert!(instance.logic_mut().is_ok());
    }

    #[test]
    fn test_failed_initialize_is_retryable_state() {
        let mut factory = Factory::<Allowance>::for_logic();
        let mut instance = factory.create_clone(&config(0), ());
        assert_eq!(instance.initialize(), Err(AllowanceError::ZeroLimit));
        assert!(!instance.initialized());
        assert_eq!(instance.initialize(), Err(AllowanceError::ZeroLimit));
    }

    #[test]
    fn test_event_serializes() {
        let event = CloneDeployed {
            clone: Address::derive(b"c"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["clone"], event.clone.to_string());
    }
}
