//! # Scope Subcommand
//!
//! Computes the scope a Semaphore proof must carry for a given prover and
//! group. Group ids wider than 96 bits cannot be bound and are rejected.

use anyhow::bail;
use clap::Args;
use excubiae_core::{Address, Word};
use excubiae_zkp::scope;
use serde::Serialize;

/// Arguments for the scope subcommand.
#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// The subject that will submit the proof.
    #[arg(long)]
    pub prover: Address,
    /// Group id, decimal or `0x` hex.
    #[arg(long)]
    pub group_id: Word,
}

/// A bound scope.
#[derive(Debug, Serialize)]
pub struct ScopeReport {
    pub prover: Address,
    pub group_id: Word,
    pub scope: Word,
}

pub fn run(args: ScopeArgs) -> anyhow::Result<ScopeReport> {
    if !scope::fits(&args.group_id) {
        bail!("group id {} does not fit in 96 bits", args.group_id);
    }
    Ok(ScopeReport {
        prover: args.prover,
        group_id: args.group_id,
        scope: scope::bind(&args.prover, &args.group_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_splits_back() {
        let prover = Address::derive(b"prover");
        let report = run(ScopeArgs {
            prover,
            group_id: Word::from_u64(7),
        })
        .unwrap();
        assert_eq!(scope::prover(&report.scope), prover);
        assert_eq!(scope::group_id(&report.scope), Word::from_u64(7));
    }

    #[test]
    fn test_wide_group_id_rejected() {
        let result = run(ScopeArgs {
            prover: Address::derive(b"prover"),
            group_id: Word::from_u128(u128::MAX),
        });
        assert!(result.is_err());
    }
}
