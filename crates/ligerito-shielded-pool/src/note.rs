//! the note model (§4.3): commitment/nullifier algebra, encryption, and
//! serialization.
//!
//! `Note::new` normalizes `token` to 20 bytes and `random` to 16 bytes;
//! `notePublicKey` and `hash` are Poseidon derivations; encryption packs
//! `[masterPublicKey (32B), token (20B), random‖value (16B‖16B)]` as three
//! AES-GCM chunks.

use shielded_crypto::aead::{self, Ciphertext};
use shielded_crypto::field::{self, Field};
use shielded_crypto::poseidon::poseidon;

use crate::keys::Address;
use crate::value::TokenId;
use crate::Error;

/// `Poseidon(notePublicKey, token, value)`, the on-chain commitment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteHash(pub Field);

impl NoteHash {
    pub fn to_hex(&self) -> String {
        field::to_hex(&self.0)
    }
}

/// a full plaintext note: `{ masterPublicKey, viewingPublicKey, token,
/// random, value }` (§3)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub master_public_key: Field,
    pub viewing_public_key: [u8; 32],
    pub token: TokenId,
    pub random: [u8; 16],
    pub value: u128,
}

/// a note recovered by decryption, missing `viewingPublicKey` (§9: "the
/// decryption path produces a note missing `viewingPublicKey`; the type
/// system should force the consumer to rebind the recipient identity
/// before using the note for output creation").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialNote {
    pub master_public_key: Field,
    pub token: TokenId,
    pub random: [u8; 16],
    pub value: u128,
}

impl PartialNote {
    /// rebind the recipient's viewing public key, producing a usable [`Note`]
    pub fn rebind(self, viewing_public_key: [u8; 32]) -> Note {
        Note {
            master_public_key: self.master_public_key,
            viewing_public_key,
            token: self.token,
            random: self.random,
            value: self.value,
        }
    }
}

fn random_field(random: &[u8; 16]) -> Field {
    field::from_bytes_be_mod_order(random)
}

fn token_field(token: &TokenId) -> Field {
    field::from_bytes_be_mod_order(&token.to_bytes())
}

fn value_field(value: u128) -> Field {
    field::from_bytes_be_mod_order(&value.to_be_bytes())
}

impl Note {
    /// `Note::new(address, random, value, token)`; `token` and `random`
    /// are normalized to their fixed widths
    pub fn new(address: &Address, random: [u8; 16], value: u128, token: &[u8]) -> Self {
        Self {
            master_public_key: address.master_public_key,
            viewing_public_key: address.viewing_public_key,
            token: TokenId::normalize(token),
            random,
            value,
        }
    }

    /// `notePublicKey = Poseidon(masterPublicKey, random)`
    pub fn note_public_key(&self) -> Result<Field, Error> {
        Ok(poseidon(&[self.master_public_key, random_field(&self.random)])?)
    }

    /// `hash = Poseidon(notePublicKey, token, value)`
    pub fn hash(&self) -> Result<NoteHash, Error> {
        let npk = self.note_public_key()?;
        let h = poseidon(&[npk, token_field(&self.token), value_field(self.value)])?;
        Ok(NoteHash(h))
    }

    /// encrypt `[masterPublicKey, token, random‖value]` as three AES-GCM
    /// chunks under an ECDH-derived shared key
    pub fn encrypt(&self, shared_key: &[u8; 32]) -> Result<Ciphertext, Error> {
        let mpk_bytes = field::to_bytes_be(&self.master_public_key);
        let token_bytes = self.token.to_bytes();
        let mut random_value = [0u8; 32];
        random_value[..16].copy_from_slice(&self.random);
        random_value[16..].copy_from_slice(&self.value.to_be_bytes());

        Ok(aead::encrypt(
            &[&mpk_bytes, &token_bytes, &random_value],
            shared_key,
        )?)
    }

    /// inverse of [`Note::encrypt`]. the recipient's `viewingPublicKey` is
    /// never transmitted, so decryption yields a [`PartialNote`]; the
    /// caller must rebind the recipient identity before the note can be
    /// used to construct an output.
    pub fn decrypt(ciphertext: &Ciphertext, shared_key: &[u8; 32]) -> Result<PartialNote, Error> {
        let chunks = aead::decrypt(ciphertext, shared_key)?;
        if chunks.len() != 3 || chunks[0].len() != 32 || chunks[1].len() != 20 || chunks[2].len() != 32
        {
            return Err(Error::MalformedNotePayload);
        }

        let master_public_key = field::from_bytes_be_mod_order(&chunks[0]);
        let token = TokenId::normalize(&chunks[1]);
        let mut random = [0u8; 16];
        random.copy_from_slice(&chunks[2][..16]);
        let value = u128::from_be_bytes(chunks[2][16..32].try_into().expect("32-byte chunk"));

        Ok(PartialNote {
            master_public_key,
            token,
            random,
            value,
        })
    }
}

/// `{npk, token, value, encryptedRandom}`, the persisted/serialized shape
/// of a note preimage (§4.3: "serialize/deserialize persist
/// `{npk, token, value, encryptedRandom}`")
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedNote {
    pub npk: [u8; 32],
    pub token: [u8; 20],
    pub value: u128,
    pub encrypted_random: Ciphertext,
}

impl Note {
    /// `encryptedRandom = aes-gcm([random], viewingPrivateKey)`
    pub fn serialize(&self, viewing_private_key: &[u8; 32]) -> Result<SerializedNote, Error> {
        let npk = field::to_bytes_be(&self.note_public_key()?);
        let encrypted_random = aead::encrypt(&[&self.random], viewing_private_key)?;
        Ok(SerializedNote {
            npk,
            token: self.token.to_bytes(),
            value: self.value,
            encrypted_random,
        })
    }

    /// decrypt `encryptedRandom` under `viewingPrivateKey`, recovering
    /// `random` without revealing the note to anyone else; `npk`/`token`/
    /// `value` pass through unchanged since they are not re-encrypted
    pub fn deserialize(
        serialized: &SerializedNote,
        viewing_private_key: &[u8; 32],
    ) -> Result<(Field, TokenId, u128, [u8; 16]), Error> {
        let plaintext = aead::decrypt(&serialized.encrypted_random, viewing_private_key)?;
        let random_bytes = plaintext.first().ok_or(Error::MalformedNotePayload)?;
        if random_bytes.len() != 16 {
            return Err(Error::MalformedNotePayload);
        }
        let mut random = [0u8; 16];
        random.copy_from_slice(random_bytes);

        let npk = field::from_bytes_be_mod_order(&serialized.npk);
        Ok((npk, TokenId(serialized.token), serialized.value, random))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address() -> Address {
        Address::new(Field::from(11u64), [22u8; 32], Some(1))
    }

    #[test]
    fn hash_is_deterministic_and_blind_to_random() {
        let addr = test_address();
        let note_a = Note::new(&addr, [1u8; 16], 1000, &[9u8; 20]);
        let note_b = Note::new(&addr, [1u8; 16], 1000, &[9u8; 20]);
        assert_eq!(note_a.hash().unwrap(), note_b.hash().unwrap());

        let note_c = Note::new(&addr, [2u8; 16], 1000, &[9u8; 20]);
        assert_ne!(note_a.hash().unwrap(), note_c.hash().unwrap());
    }

    #[test]
    fn encrypt_decrypt_roundtrip_yields_partial_note() {
        let addr = test_address();
        let note = Note::new(&addr, [3u8; 16], 42_000, &[5u8; 20]);
        let shared_key = [77u8; 32];

        let ciphertext = note.encrypt(&shared_key).unwrap();
        let partial = Note::decrypt(&ciphertext, &shared_key).unwrap();

        assert_eq!(partial.master_public_key, note.master_public_key);
        assert_eq!(partial.token, note.token);
        assert_eq!(partial.random, note.random);
        assert_eq!(partial.value, note.value);

        // the recipient must rebind their own viewing public key
        let rebuilt = partial.rebind(note.viewing_public_key);
        assert_eq!(rebuilt.hash().unwrap(), note.hash().unwrap());
    }

    #[test]
    fn wrong_shared_key_fails_to_decrypt() {
        let addr = test_address();
        let note = Note::new(&addr, [4u8; 16], 7, &[1u8; 20]);
        let ciphertext = note.encrypt(&[1u8; 32]).unwrap();
        assert!(Note::decrypt(&ciphertext, &[2u8; 32]).is_err());
    }

    #[test]
    fn serialize_deserialize_recovers_random_under_viewing_key() {
        let addr = test_address();
        let note = Note::new(&addr, [8u8; 16], 555, &[6u8; 20]);
        let vk = [99u8; 32];

        let serialized = note.serialize(&vk).unwrap();
        let (npk, token, value, random) = Note::deserialize(&serialized, &vk).unwrap();

        assert_eq!(npk, note.note_public_key().unwrap());
        assert_eq!(token, note.token);
        assert_eq!(value, note.value);
        assert_eq!(random, note.random);

        // wrong viewing key cannot recover the random (and thus cannot
        // reconstruct the note, "revealing the note to anyone else")
        assert!(Note::deserialize(&serialized, &[1u8; 32]).is_err());
    }
}
