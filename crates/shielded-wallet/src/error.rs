//! error taxonomy for the wallet scan engine (§7)
//!
//! `NotAddressedToUs` never reaches this type: a failed decrypt attempt is
//! handled inline in `scanner::scan_leaves` (logged at debug, leaf skipped)
//! and is not an error condition for the caller. Everything here is a
//! genuine fault: storage, malformed persisted data, or a missing chain
//! dependency.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] shielded_kv::Error),

    #[error("merkle tree error: {0}")]
    Merkle(#[from] shielded_merkle_tree::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] shielded_crypto::Error),

    #[error("note error: {0}")]
    Note(#[from] ligerito_shielded_pool::Error),

    /// an expected leaf or node was absent where persisted state required
    /// one; §7 "MissingData ... treated as zero-value and logged" covers
    /// the merkle side, this covers a wallet-side lookup (e.g. a
    /// `WalletDetails` record gone missing for a chain that has scanned
    /// before).
    #[error("missing data: {0}")]
    MissingData(String),

    #[error("stored TXO record at ({tree}, {position}) is malformed")]
    MalformedStoredTxo { tree: u32, position: u64 },

    #[error("wallet record is malformed")]
    MalformedWalletRecord,

    #[error("bincode encode/decode error: {0}")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
