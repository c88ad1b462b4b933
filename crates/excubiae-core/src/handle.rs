//! # Addressed Handles
//!
//! A [`Bound`] is a shared capability together with the address it answers
//! to. Configuration bytes carry addresses; live collaborators are trait
//! objects. Initialization compares the two so that an instance can never
//! run against a collaborator other than the one its configuration names.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::identity::Address;

/// A shared collaborator reachable at a fixed address.
pub struct Bound<T: ?Sized> {
    address: Address,
    inner: Arc<T>,
}

impl<T: ?Sized> Bound<T> {
    /// Bind `inner` to `address`.
    pub fn new(address: Address, inner: Arc<T>) -> Self {
        Self { address, inner }
    }

    /// The address this collaborator answers to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The shared capability.
    pub fn shared(&self) -> &Arc<T> {
        &self.inner
    }
}

impl<T: ?Sized> Clone for Bound<T> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> fmt::Debug for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound").field("address", &self.address).finish()
    }
}
