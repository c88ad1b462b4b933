//! # Merkle Subcommand
//!
//! Allowlist files are YAML or JSON, either a bare list of addresses or a
//! mapping with an `addresses` key:
//!
//! ```yaml
//! addresses:
//!   - "0x5b38da6a701c568545dcfcb03fcb875f56beddc4"
//!   - "0xab8483f64d9c6d1ecf9b849ae677dd3315835cb2"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use excubiae_core::{Address, Word};
use excubiae_crypto::merkle::{address_leaf, verify_proof};
use excubiae_crypto::MerkleTree;
use serde::{Deserialize, Serialize};

/// Arguments for the merkle subcommand.
#[derive(Args, Debug)]
pub struct MerkleArgs {
    #[command(subcommand)]
    pub command: MerkleCommand,
}

#[derive(Subcommand, Debug)]
pub enum MerkleCommand {
    /// Print the root of an allowlist.
    Root {
        /// Allowlist file (YAML or JSON).
        #[arg(long)]
        leaves: PathBuf,
    },
    /// Print the membership proof for one address.
    Proof {
        /// Allowlist file (YAML or JSON).
        #[arg(long)]
        leaves: PathBuf,
        /// Member to prove.
        #[arg(long)]
        address: Address,
    },
    /// Check a proof against a root.
    Verify {
        #[arg(long)]
        root: Word,
        #[arg(long)]
        address: Address,
        /// Sibling hashes, leaf to root.
        #[arg(long, num_args = 0..)]
        proof: Vec<Word>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllowlistFile {
    Bare(Vec<Address>),
    Wrapped { addresses: Vec<Address> },
}

/// Root of an allowlist.
#[derive(Debug, Serialize)]
pub struct RootReport {
    pub root: Word,
    pub leaves: usize,
}

/// Membership proof for one address.
#[derive(Debug, Serialize)]
pub struct ProofReport {
    pub root: Word,
    pub address: Address,
    pub leaf: Word,
    pub proof: Vec<Word>,
}

/// Outcome of a verification.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub root: Word,
    pub address: Address,
    pub valid: bool,
}

/// Parse an allowlist document. JSON is read with `serde_json`; everything
/// else goes through `serde_yaml`.
pub fn parse_allowlist(text: &str, json: bool) -> anyhow::Result<Vec<Address>> {
    let file: AllowlistFile = if json {
        serde_json::from_str(text).context("parsing JSON allowlist")?
    } else {
        serde_yaml::from_str(text).context("parsing YAML allowlist")?
    };
    let addresses = match file {
        AllowlistFile::Bare(addresses) | AllowlistFile::Wrapped { addresses } => addresses,
    };
    if addresses.is_empty() {
        bail!("allowlist is empty");
    }
    Ok(addresses)
}

/// Read an allowlist from disk, choosing the format by extension.
pub fn load_allowlist(path: &Path) -> anyhow::Result<Vec<Address>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading allowlist {}", path.display()))?;
    let json = path.extension().is_some_and(|ext| ext == "json");
    parse_allowlist(&text, json).with_context(|| format!("loading {}", path.display()))
}

pub fn root(addresses: &[Address]) -> anyhow::Result<RootReport> {
    let tree = MerkleTree::of_addresses(addresses)?;
    tracing::debug!(leaves = tree.len(), root = %tree.root(), "built allowlist tree");
    Ok(RootReport {
        root: tree.root(),
        leaves: tree.len(),
    })
}

pub fn proof(addresses: &[Address], address: &Address) -> anyhow::Result<ProofReport> {
    let tree = MerkleTree::of_addresses(addresses)?;
    let proof = tree
        .proof_for_address(address)
        .with_context(|| format!("{address} is not on the allowlist"))?;
    Ok(ProofReport {
        root: tree.root(),
        address: *address,
        leaf: address_leaf(address),
        proof,
    })
}

pub fn verify(root: &Word, address: &Address, proof: &[Word]) -> VerifyReport {
    VerifyReport {
        root: *root,
        address: *address,
        valid: verify_proof(root, address_leaf(address), proof),
    }
}

/// Dispatch a merkle subcommand to its JSON report.
pub fn run(args: MerkleArgs) -> anyhow::Result<serde_json::Value> {
    let value = match args.command {
        MerkleCommand::Root { leaves } => serde_json::to_value(root(&load_allowlist(&leaves)?)?)?,
        MerkleCommand::Proof { leaves, address } => {
            serde_json::to_value(proof(&load_allowlist(&leaves)?, &address)?)?
        }
        MerkleCommand::Verify {
            root,
            address,
            proof,
        } => serde_json::to_value(verify(&root, &address, &proof))?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<Address> {
        (0..5)
            .map(|i| Address::derive(format!("member-{i}").as_bytes()))
            .collect()
    }

    fn yaml(addresses: &[Address]) -> String {
        let mut doc = String::from("addresses:\n");
        for a in addresses {
            doc.push_str(&format!("  - \"{a}\"\n"));
        }
        doc
    }

    #[test]
    fn test_parse_wrapped_yaml() {
        let parsed = parse_allowlist(&yaml(&members()), false).unwrap();
        assert_eq!(parsed, members());
    }

    #[test]
    fn test_parse_bare_json() {
        let json = serde_json::to_string(&members()).unwrap();
        assert_eq!(parse_allowlist(&json, true).unwrap(), members());
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(parse_allowlist("[]", true).is_err());
        assert!(parse_allowlist("addresses: [\"0x12\"]", false).is_err());
    }

    #[test]
    fn test_root_matches_tree() {
        let report = root(&members()).unwrap();
        assert_eq!(report.leaves, 5);
        assert_eq!(report.root, MerkleTree::of_addresses(&members()).unwrap().root());
    }

    #[test]
    fn test_proof_then_verify() {
        let members = members();
        let report = proof(&members, &members[3]).unwrap();
        assert!(verify(&report.root, &members[3], &report.proof).valid);
        assert!(!verify(&report.root, &members[2], &report.proof).valid);
    }

    #[test]
    fn test_proof_for_outsider_fails() {
        let outsider = Address::derive(b"outsider");
        let err = proof(&members(), &outsider).unwrap_err();
        assert!(err.to_string().contains("not on the allowlist"));
    }

    #[test]
    fn test_report_serializes_hex() {
        let value = serde_json::to_value(root(&members()).unwrap()).unwrap();
        assert!(value["root"].as_str().unwrap().starts_with("0x"));
        assert_eq!(value["leaves"], 5);
    }
}
