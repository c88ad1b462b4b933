//! # Owner and Target
//!
//! The owner is fixed at initialization. The target starts unset and may be
//! set exactly once, by the owner, to a non-zero address. After that every
//! enforcement call must come from the target.

use excubiae_core::Address;

use crate::error::PolicyError;

/// One-time target slot guarded by an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSlot {
    owner: Address,
    target: Option<Address>,
}

impl TargetSlot {
    /// An unset slot administered by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            target: None,
        }
    }

    /// The administrator.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The target, once set.
    pub fn target(&self) -> Option<Address> {
        self.target
    }

    /// Set the target. Checks run owner, then zero address, then already set.
    pub fn set(&mut self, caller: &Address, target: Address) -> Result<(), PolicyError> {
        if *caller != self.owner {
            return Err(PolicyError::Unauthorized {
                caller: *caller,
                owner: self.owner,
            });
        }
        if target.is_zero() {
            return Err(PolicyError::ZeroAddress);
        }
        if let Some(existing) = self.target {
            return Err(PolicyError::TargetAlreadySet(existing));
        }
        self.target = Some(target);
        Ok(())
    }

    /// The target, if `caller` is it.
    pub fn require_target(&self, caller: &Address) -> Result<Address, PolicyError> {
        match self.target {
            Some(target) if target == *caller => Ok(target),
            _ => Err(PolicyError::TargetOnly { caller: *caller }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actors() -> (Address, Address, Address) {
        (
            Address::derive(b"owner"),
            Address::derive(b"target"),
            Address::derive(b"stranger"),
        )
    }

    #[test]
    fn test_set_once() {
        let (owner, target, other) = actors();
        let mut slot = TargetSlot::new(owner);
        assert_eq!(slot.target(), None);
        slot.set(&owner, target).unwrap();
        assert_eq!(slot.target(), Some(target));
        assert_eq!(
            slot.set(&owner, other),
            Err(PolicyError::TargetAlreadySet(target))
        );
        assert_eq!(slot.target(), Some(target));
    }

    #[test]
    fn test_owner_checked_before_zero() {
        let (owner, _, stranger) = actors();
        let mut slot = TargetSlot::new(owner);
        assert_eq!(
            slot.set(&stranger, Address::ZERO),
            Err(PolicyError::Unauthorized {
                caller: stranger,
                owner
            })
        );
        assert_eq!(slot.set(&owner, Address::ZERO), Err(PolicyError::ZeroAddress));
    }

    #[test]
    fn test_require_target() {
        let (owner, target, stranger) = actors();
        let mut slot = TargetSlot::new(owner);
        assert_eq!(
            slot.require_target(&target),
            Err(PolicyError::TargetOnly { caller: target })
        );
        slot.set(&owner, target).unwrap();
        assert_eq!(slot.require_target(&target), Ok(target));
        assert!(slot.require_target(&stranger).is_err());
        assert!(slot.require_target(&owner).is_err());
    }
}
