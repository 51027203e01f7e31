use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("decryption failed for key")]
    DecryptionFailed,
}

pub type Result<T> = std::result::Result<T, Error>;
