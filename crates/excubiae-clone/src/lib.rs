//! # excubiae-clone — Factory / Clone Lifecycle
//!
//! Many independently configured instances of one piece of logic. A
//! [`Factory`] holds the logic type, and each `deploy` produces an
//! [`Instance`] carrying:
//!
//! - its own address, derived from the factory address and a nonce;
//! - the ABI-encoded configuration, appended once and read-only thereafter;
//! - the live collaborators (checkers, registries) the logic runs against.
//!
//! ## Lifecycle
//!
//! ```text
//!   create_clone ──▶ Instance (uninitialized) ──initialize()──▶ Instance (live)
//!                         │                                        │
//!                         └─ any use: NotInitialized                └─ initialize(): AlreadyInitialized
//! ```
//!
//! `deploy` runs both steps and only commits the clone if initialization
//! succeeds.
//!
//! ## Crate Policy
//!
//! - Depends only on `excubiae-core` internally.
//! - Appended bytes are never mutated after the clone is created.

pub mod error;
pub mod factory;
pub mod instance;

pub use error::FactoryError;
pub use factory::{CloneDeployed, CloneRecord, Factory};
pub use instance::{Clonable, Instance};
