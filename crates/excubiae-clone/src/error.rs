//! # Error Types — Clone Lifecycle

use excubiae_core::{Address, CodecError};
use thiserror::Error;

/// Error in the clone lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// `initialize` was called on an instance that already ran it.
    #[error("instance {0} is already initialized")]
    AlreadyInitialized(Address),

    /// The instance was used before `initialize` completed.
    #[error("instance {0} is not initialized")]
    NotInitialized(Address),

    /// The appended configuration could not be decoded.
    #[error("appended configuration is malformed: {0}")]
    Codec(#[from] CodecError),

    /// A live collaborator answers to a different address than the one the
    /// configuration names.
    #[error("{role} bound at {bound} but configured as {configured}")]
    BindingMismatch {
        /// Which collaborator.
        role: &'static str,
        /// Address in the appended configuration.
        configured: Address,
        /// Address of the supplied handle.
        bound: Address,
    },
}

impl FactoryError {
    /// Fail with [`FactoryError::BindingMismatch`] unless the addresses agree.
    pub fn ensure_bound(
        role: &'static str,
        configured: Address,
        bound: Address,
    ) -> Result<(), FactoryError> {
        if configured != bound {
            return Err(FactoryError::BindingMismatch {
                role,
                configured,
                bound,
            });
        }
        Ok(())
    }
}
