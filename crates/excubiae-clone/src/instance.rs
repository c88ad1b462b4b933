//! # Clone Instances
//!
//! An [`Instance`] is a handle to one deployment of a [`Clonable`] logic
//! type. Its configuration lives only in the appended bytes; the logic is
//! rebuilt from them by `initialize`, which runs at most once.
//!
//! ## Security Invariant
//!
//! `logic()` and `logic_mut()` are the only ways to reach the logic, and
//! both fail with [`FactoryError::NotInitialized`] until `initialize`
//! succeeds. A failed `initialize` leaves the instance uninitialized and
//! retryable; a successful one can never run again.

use std::fmt;

use excubiae_core::{AbiType, Address};

use crate::error::FactoryError;

/// Logic that can be deployed through a [`crate::Factory`].
pub trait Clonable: Sized {
    /// Family tag reported by deployed instances.
    const NAME: &'static str;

    /// Immutable configuration, stored as appended bytes.
    type Config: AbiType;

    /// Live collaborators that cannot travel as bytes.
    type Bindings: Clone;

    /// Error raised by initialization and by the logic itself.
    type Error: From<FactoryError>;

    /// Build the logic from its decoded configuration.
    fn initialize(config: Self::Config, bindings: Self::Bindings) -> Result<Self, Self::Error>;
}

/// One deployed clone.
pub struct Instance<L: Clonable> {
    address: Address,
    factory: Address,
    appended: Vec<u8>,
    bindings: Option<L::Bindings>,
    logic: Option<L>,
}

impl<L: Clonable> Instance<L> {
    pub(crate) fn new(
        address: Address,
        factory: Address,
        appended: Vec<u8>,
        bindings: L::Bindings,
    ) -> Self {
        Self {
            address,
            factory,
            appended,
            bindings: Some(bindings),
            logic: None,
        }
    }

    /// This clone's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The factory that created this clone.
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// The immutable configuration bytes appended at creation.
    pub fn appended_bytes(&self) -> &[u8] {
        &self.appended
    }

    /// Decode the appended configuration.
    pub fn config(&self) -> Result<L::Config, FactoryError> {
        Ok(L::Config::abi_decode(&self.appended)?)
    }

    /// Whether `initialize` has completed.
    pub fn initialized(&self) -> bool {
        self.logic.is_some()
    }

    /// Decode the appended configuration and build the logic. Runs once.
    pub fn initialize(&mut self) -> Result<(), L::Error> {
        if self.logic.is_some() {
            return Err(FactoryError::AlreadyInitialized(self.address).into());
        }
        let bindings = self
            .bindings
            .clone()
            .ok_or(FactoryError::AlreadyInitialized(self.address))?;
        let config = self.config()?;
        let logic = L::initialize(config, bindings)?;
        self.logic = Some(logic);
        self.bindings = None;
        tracing::debug!(clone = %self.address, kind = L::NAME, "clone initialized");
        Ok(())
    }

    /// The initialized logic.
    pub fn logic(&self) -> Result<&L, FactoryError> {
        self.logic
            .as_ref()
            .ok_or(FactoryError::NotInitialized(self.address))
    }

    /// The initialized logic, mutably.
    pub fn logic_mut(&mut self) -> Result<&mut L, FactoryError> {
        let address = self.address;
        self.logic
            .as_mut()
            .ok_or(FactoryError::NotInitialized(address))
    }
}

impl<L: Clonable> fmt::Debug for Instance<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("kind", &L::NAME)
            .field("address", &self.address)
            .field("factory", &self.factory)
            .field("appended_len", &self.appended.len())
            .field("initialized", &self.initialized())
            .finish()
    }
}
