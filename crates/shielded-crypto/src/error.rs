use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("poseidon hash requires at least one input")]
    EmptyPoseidonInput,

    #[error("poseidon error: {0}")]
    Poseidon(String),

    #[error("babyjubjub error: {0}")]
    BabyJubJub(String),

    #[error("blinding scalar is zero")]
    ZeroBlindingScalar,

    #[error("ed25519 error: {0}")]
    Ed25519(String),

    #[error("aead error: {0}")]
    Aead(String),

    #[error("aead decryption/authentication failed")]
    DecryptionFailed,
}
