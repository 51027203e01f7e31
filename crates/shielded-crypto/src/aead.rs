//! aes-256-gcm encryption of note payload chunks
//!
//! §4.1: `encrypt([plaintextChunks], key) → {iv, tag, data[]}` and its
//! inverse. the chunks are concatenated and encrypted as a single
//! aes-gcm message (one nonce, one authentication tag), then the
//! ciphertext is split back into chunks of the same lengths as the
//! input for wire transport — this is what lets the note model pack
//! `[masterPublicKey (32B), token (20B), random‖value (16B‖16B)]` as
//! three logical fields while only ever using the nonce once.

use aes_gcm::aead::{generic_array::GenericArray, Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::Error;

/// a multi-chunk aes-gcm ciphertext bundle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub iv: [u8; 12],
    pub tag: [u8; 16],
    pub data: Vec<Vec<u8>>,
}

/// encrypt `chunks` as a single aes-gcm message, then re-split the
/// resulting ciphertext into pieces matching the input chunk lengths
pub fn encrypt(chunks: &[&[u8]], key: &[u8; 32]) -> Result<Ciphertext, Error> {
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
    let mut iv = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    let mut plaintext = Vec::new();
    for chunk in chunks {
        plaintext.extend_from_slice(chunk);
    }

    let mut sealed = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| Error::Aead(e.to_string()))?;

    let split_at = sealed.len() - 16;
    let mut tag = [0u8; 16];
    tag.copy_from_slice(&sealed[split_at..]);
    sealed.truncate(split_at);

    let mut data = Vec::with_capacity(chunks.len());
    let mut offset = 0;
    for chunk in chunks {
        data.push(sealed[offset..offset + chunk.len()].to_vec());
        offset += chunk.len();
    }

    Ok(Ciphertext { iv, tag, data })
}

/// inverse of [`encrypt`]
pub fn decrypt(ciphertext: &Ciphertext, key: &[u8; 32]) -> Result<Vec<Vec<u8>>, Error> {
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
    let nonce = Nonce::from_slice(&ciphertext.iv);

    let mut sealed = Vec::new();
    for chunk in &ciphertext.data {
        sealed.extend_from_slice(chunk);
    }
    sealed.extend_from_slice(&ciphertext.tag);

    let plaintext = cipher
        .decrypt(nonce, sealed.as_slice())
        .map_err(|_| Error::DecryptionFailed)?;

    let mut out = Vec::with_capacity(ciphertext.data.len());
    let mut offset = 0;
    for chunk in &ciphertext.data {
        out.push(plaintext[offset..offset + chunk.len()].to_vec());
        offset += chunk.len();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = [42u8; 32];
        let chunks: [&[u8]; 3] = [b"hello", b"worldwide", b"!"];
        let ct = encrypt(&chunks, &key).unwrap();
        let pt = decrypt(&ct, &key).unwrap();
        assert_eq!(pt[0], b"hello");
        assert_eq!(pt[1], b"worldwide");
        assert_eq!(pt[2], b"!");
    }

    #[test]
    fn wrong_key_fails() {
        let key = [1u8; 32];
        let wrong = [2u8; 32];
        let ct = encrypt(&[b"secret"], &key).unwrap();
        assert!(decrypt(&ct, &wrong).is_err());
    }

    #[test]
    fn tampered_tag_fails() {
        let key = [3u8; 32];
        let mut ct = encrypt(&[b"payload"], &key).unwrap();
        ct.tag[0] ^= 0xff;
        assert!(decrypt(&ct, &key).is_err());
    }
}
