//! ed25519 viewing-key signatures
//!
//! the viewing keypair doubles as the note-scanning identity (§4.4): its
//! signing key is also the scalar used for babyjubjub ecdh against note
//! ephemeral keys (see `crate::babyjubjub::ecdh`).

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::Error;

/// wraps an ed25519 signing key (32-byte seed)
pub struct EdSigningKey(SigningKey);

impl EdSigningKey {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(SigningKey::from_bytes(&seed))
    }

    pub fn seed(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn verifying_key(&self) -> EdVerifyingKey {
        EdVerifyingKey(self.0.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.0.sign(message).to_bytes()
    }
}

/// wraps an ed25519 verifying (public) key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdVerifyingKey(VerifyingKey);

impl EdVerifyingKey {
    /// parse a 32-byte public key, rejecting malformed/non-canonical
    /// encodings (§4.1: "verify with rejection on malformed public keys")
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        VerifyingKey::from_bytes(bytes)
            .map(EdVerifyingKey)
            .map_err(|e| Error::Ed25519(e.to_string()))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        match DalekSignature::from_slice(signature) {
            Ok(sig) => self.0.verify(message, &sig).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let sk = EdSigningKey::from_seed([9u8; 32]);
        let vk = sk.verifying_key();
        let msg = b"ligerito wallet details";
        let sig = sk.sign(msg);
        assert!(vk.verify(msg, &sig));
        assert!(!vk.verify(b"tampered", &sig));
    }

    #[test]
    fn malformed_public_key_rejected() {
        // a buffer of all-0xFF is not a valid compressed edwards point
        let malformed = [0xFFu8; 32];
        assert!(EdVerifyingKey::from_bytes(&malformed).is_err());
    }
}
