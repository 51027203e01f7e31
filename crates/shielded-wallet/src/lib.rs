//! the wallet scan engine (§4.4): an incremental, lock-protected scanner
//! that walks new leaves, attempts decryption with the viewing key,
//! persists decrypted notes, and computes live balances from persisted
//! state plus on-chain nullifier evidence.
//!
//! ties together [`shielded_merkle_tree`] (new leaves), [`ligerito_shielded_pool`]
//! (the note/nullifier algebra), [`shielded_crypto`] (ECDH, AEAD), and
//! [`shielded_kv`] (persistence) into the component graph from spec §2.

pub mod chain_source;
pub mod commitment;
pub mod constants;
pub mod details;
mod error;
pub mod events;
pub mod hd;
pub mod identity;
mod scanner;
pub mod txo;

pub use commitment::{Commitment, CommitmentBatch, CommitmentHeader, Preimage};
pub use error::{Error, Result};
pub use events::ScannedEvent;
pub use scanner::Wallet;
