//! the commitment merkle tree (§4.2): an append-only, fixed-depth,
//! Poseidon-hashed tree family with a write cache and a queued,
//! single-flight update loop.
//!
//! a [`MerkleTree`] multiplexes many independent trees (by `tree` index)
//! under one `(chainId, purpose)` namespace, matching the on-chain
//! protocol's per-tree commitment numbering.

pub mod constants;
mod error;
mod tree;
mod zero_values;

pub use constants::{merkle_zero_value, DEPTH, TOTAL_LEAVES};
pub use error::{Error, Result};
pub use tree::MerkleTree;
