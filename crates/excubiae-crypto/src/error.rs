//! # Error Types — Tree Construction Failures

use excubiae_core::Word;
use thiserror::Error;

/// Error building or querying a Merkle tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree with no leaves")]
    EmptyTree,

    /// The requested value is not a leaf of this tree.
    #[error("leaf {0} is not part of the tree")]
    LeafNotFound(Word),

    /// A value index outside the tree.
    #[error("value index {index} out of range for {len} values")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of values in the tree.
        len: usize,
    },

    /// A dump whose node array is inconsistent with its values.
    #[error("malformed tree dump: {0}")]
    MalformedDump(String),
}
