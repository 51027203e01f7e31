use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("crypto error: {0}")]
    Crypto(#[from] shielded_crypto::Error),

    #[error("address encoding error: {0}")]
    Address(String),

    #[error("malformed note payload")]
    MalformedNotePayload,
}
