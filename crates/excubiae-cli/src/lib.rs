//! # excubiae-cli — Offline Tooling
//!
//! Helpers for preparing and inspecting policy deployments without a
//! running host: building allowlist trees, binding Semaphore scopes, and
//! reading back the configuration appended to a clone.
//!
//! ## Subcommands
//!
//! - `merkle` — allowlist root, per-address proof, and proof verification
//! - `scope` — bind a prover address to a group id
//! - `decode-config` — decode appended configuration bytes into JSON
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the `*Args` structs; handlers return
//!   serializable reports and never print.
//! - Handlers delegate to the domain crates. No enforcement logic here.

pub mod config;
pub mod merkle;
pub mod scope;
