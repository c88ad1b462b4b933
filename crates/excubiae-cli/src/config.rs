//! # Decode-Config Subcommand
//!
//! Reads the configuration bytes appended to a clone and renders them as
//! the same JSON document the configuration structs deserialize from.

use anyhow::Context;
use clap::{Args, ValueEnum};
use excubiae_checker::{MerkleProofConfig, SemaphoreConfig};
use excubiae_core::identity::hex_to_bytes;
use excubiae_core::AbiType;
use excubiae_policy::{AdvancedPolicyConfig, BasePolicyConfig};
use serde::Serialize;

/// Which configuration layout to decode.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// `(owner, checker)`: base, Semaphore, and gate policies.
    Base,
    /// `(owner, checker, skipPre, skipPost, allowMultipleMain)`.
    Advanced,
    /// `(root)`: Merkle allowlist checker.
    MerkleProof,
    /// `(semaphore, groupId)`: Semaphore checker.
    Semaphore,
}

/// Arguments for the decode-config subcommand.
#[derive(Args, Debug)]
pub struct DecodeConfigArgs {
    #[arg(long, value_enum)]
    pub kind: ConfigKind,
    /// Appended bytes as hex, `0x` optional.
    #[arg(long)]
    pub bytes: String,
}

fn decode_as<C: AbiType + Serialize>(bytes: &[u8]) -> anyhow::Result<serde_json::Value> {
    let config = C::abi_decode(bytes)?;
    Ok(serde_json::to_value(config)?)
}

pub fn decode(kind: ConfigKind, bytes: &[u8]) -> anyhow::Result<serde_json::Value> {
    tracing::debug!(?kind, len = bytes.len(), "decoding appended configuration");
    let value = match kind {
        ConfigKind::Base => decode_as::<BasePolicyConfig>(bytes),
        ConfigKind::Advanced => decode_as::<AdvancedPolicyConfig>(bytes),
        ConfigKind::MerkleProof => decode_as::<MerkleProofConfig>(bytes),
        ConfigKind::Semaphore => decode_as::<SemaphoreConfig>(bytes),
    };
    value.with_context(|| format!("decoding {kind:?} configuration"))
}

pub fn run(args: DecodeConfigArgs) -> anyhow::Result<serde_json::Value> {
    let bytes = hex_to_bytes(args.bytes.trim()).context("reading --bytes")?;
    decode(args.kind, &bytes)
}
