//! # excubiae-core — Foundational Types for Excubiae
//!
//! This crate is the leaf of the Excubiae workspace. It defines the value
//! types every other crate speaks in: who is acting (`Address`), what is
//! being compared (`Word`), which enforcement phase is running (`Phase`),
//! and how evidence and immutable configuration are laid out on the wire
//! (the `abi` codec).
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identities and values.** An `Address` is never a bare
//!    `[u8; 20]` and a `Word` is never a bare `[u8; 32]`. Both render as
//!    `0x`-prefixed lowercase hex and serialize the same way.
//!
//! 2. **One codec.** Evidence blobs and appended clone configuration are both
//!    encoded with [`abi::encode`] and decoded with [`abi::decode`]. Malformed
//!    input is a [`CodecError`], never a silent default.
//!
//! 3. **Addressed collaborators.** [`Bound`] pairs a shared capability with
//!    the address it was configured under, so configuration bytes and live
//!    handles can be checked against each other at initialization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `excubiae-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod abi;
pub mod error;
pub mod handle;
pub mod identity;
pub mod phase;

pub use abi::{AbiType, ParamType, Token, TokenStream};
pub use error::CodecError;
pub use handle::Bound;
pub use identity::{Address, Word};
pub use phase::Phase;
