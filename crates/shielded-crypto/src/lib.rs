//! crypto primitives for the shielded-pool wallet core
//!
//! poseidon hashing, eddsa-babyjubjub (spending key signatures + ecdh),
//! ed25519 (viewing key signatures), aes-256-gcm (note encryption), and
//! the scalar/field helpers everything else in the workspace builds on.
//!
//! nothing in this crate touches storage, the chain, or proofs — it is
//! pure, synchronous computation, matching §5's "all pure computation
//! (poseidon, aes-gcm, solution planning) is synchronous".

pub mod aead;
pub mod babyjubjub;
pub mod ed25519;
mod error;
pub mod field;
pub mod poseidon;

pub use error::Error;
pub use field::Field;
