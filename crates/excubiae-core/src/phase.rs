//! # Enforcement Phase
//!
//! The three-phase life-cycle runs `Pre → Main → Post`. The discriminant is
//! part of the enforcement event (`checkType`), so the numeric values are
//! fixed: `Pre = 0`, `Main = 1`, `Post = 2`.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// A step in the three-phase enforcement life-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Eligibility check before the main action.
    Pre,
    /// The gated action itself; may repeat when the policy allows it.
    Main,
    /// Follow-up after at least one main action.
    Post,
}

impl Phase {
    /// All phases in life-cycle order.
    pub const ALL: [Phase; 3] = [Phase::Pre, Phase::Main, Phase::Post];

    /// Wire discriminant.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Pre => 0,
            Self::Main => 1,
            Self::Post => 2,
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pre),
            1 => Ok(Self::Main),
            2 => Ok(Self::Post),
            other => Err(CodecError::InvalidPhase(other)),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pre => "PRE",
            Self::Main => "MAIN",
            Self::Post => "POST",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_are_stable() {
        assert_eq!(Phase::Pre.as_u8(), 0);
        assert_eq!(Phase::Main.as_u8(), 1);
        assert_eq!(Phase::Post.as_u8(), 2);
        for phase in Phase::ALL {
            assert_eq!(Phase::try_from(phase.as_u8()).unwrap(), phase);
        }
    }

    #[test]
    fn test_invalid_discriminant() {
        assert_eq!(Phase::try_from(3), Err(CodecError::InvalidPhase(3)));
    }

    #[test]
    fn test_display_uppercase() {
        assert_eq!(Phase::Pre.to_string(), "PRE");
        assert_eq!(Phase::Post.to_string(), "POST");
    }
}
