//! # Scope Binding
//!
//! A proof's scope is `(prover << 96) | group_id`: the prover address fills
//! bytes `0..20` and the low 96 bits of the group id fill bytes `20..32`.
//! A checker recovers both halves and compares them against the subject
//! and its configured group.

use excubiae_core::{Address, Word};

const GROUP_BYTES: usize = 12;

/// Bind a prover to a group.
pub fn bind(prover: &Address, group_id: &Word) -> Word {
    let mut bytes = [0u8; 32];
    bytes[..20].copy_from_slice(prover.as_bytes());
    bytes[20..].copy_from_slice(&group_id.as_bytes()[32 - GROUP_BYTES..]);
    Word(bytes)
}

/// The prover half of a scope.
pub fn prover(scope: &Word) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&scope.as_bytes()[..20]);
    Address(bytes)
}

/// The group half of a scope.
pub fn group_id(scope: &Word) -> Word {
    let mut bytes = [0u8; 32];
    bytes[32 - GROUP_BYTES..].copy_from_slice(&scope.as_bytes()[20..]);
    Word(bytes)
}

/// Whether a group id survives binding unchanged.
pub fn fits(group_id: &Word) -> bool {
    group_id.as_bytes()[..32 - GROUP_BYTES].iter().all(|b| *b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bind_layout() {
        let prover_addr = Address::derive(b"prover");
        let scope = bind(&prover_addr, &Word::from_u64(1));
        assert_eq!(&scope.as_bytes()[..20], prover_addr.as_bytes());
        assert_eq!(scope.as_bytes()[31], 1);
    }

    #[test]
    fn test_oversized_group_truncated() {
        let mut big = [0u8; 32];
        big[0] = 0xff;
        big[31] = 5;
        let group = Word(big);
        assert!(!fits(&group));
        let scope = bind(&Address::derive(b"p"), &group);
        assert_eq!(group_id(&scope), Word::from_u64(5));
    }

    proptest! {
        #[test]
        fn test_split_inverts_bind(seed in any::<u64>(), group in any::<u64>()) {
            let prover_addr = Address::derive(&seed.to_be_bytes());
            let group = Word::from_u64(group);
            let scope = bind(&prover_addr, &group);
            prop_assert_eq!(prover(&scope), prover_addr);
            prop_assert_eq!(group_id(&scope), group);
        }
    }
}
