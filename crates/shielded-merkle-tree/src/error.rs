use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] shielded_kv::Error),

    #[error("poseidon error: {0}")]
    Poseidon(#[from] shielded_crypto::Error),

    #[error("leaf batch for tree {tree} starts at {got}, expected {expected}")]
    OutOfOrderBatch { tree: u32, expected: u64, got: u64 },

    #[error("root hash mismatch for tree {tree}: expected {expected}, computed {got}")]
    RootMismatch {
        tree: u32,
        expected: String,
        got: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
