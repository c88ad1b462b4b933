//! # Nullifier Set
//!
//! A nullifier moves from unspent to spent exactly once and never back.

use std::collections::BTreeSet;

use excubiae_core::Word;

use crate::traits::VerifyError;

/// The set of consumed nullifiers.
#[derive(Debug, Clone, Default)]
pub struct NullifierSet {
    spent: BTreeSet<Word>,
}

impl NullifierSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if `nullifier` is already spent.
    pub fn ensure_unspent(&self, nullifier: &Word) -> Result<(), VerifyError> {
        if self.spent.contains(nullifier) {
            return Err(VerifyError::NullifierAlreadySpent(*nullifier));
        }
        Ok(())
    }

    /// Mark `nullifier` spent. Fails without effect if it already was.
    pub fn consume(&mut self, nullifier: Word) -> Result<(), VerifyError> {
        if !self.spent.insert(nullifier) {
            return Err(VerifyError::NullifierAlreadySpent(nullifier));
        }
        Ok(())
    }

    /// Whether `nullifier` is spent.
    pub fn is_spent(&self, nullifier: &Word) -> bool {
        self.spent.contains(nullifier)
    }

    /// Number of spent nullifiers.
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    /// Whether nothing has been spent.
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
