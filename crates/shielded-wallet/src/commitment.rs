//! on-chain commitment shapes (§3, §9 "model as a tagged variant
//! `Commitment ∈ {Encrypted, Preimage}`; dispatch by tag")

use shielded_crypto::aead::Ciphertext;
use shielded_crypto::babyjubjub::Point;
use shielded_crypto::field::Field;
use ligerito_shielded_pool::{Amount, TokenId};

/// the hash (commitment) and txid every commitment variant carries
#[derive(Clone, Debug)]
pub struct CommitmentHeader {
    pub hash: Field,
    pub txid: [u8; 32],
}

/// `{ npk, token, value }`, the public half of a `Preimage` commitment
#[derive(Clone, Copy, Debug)]
pub struct Preimage {
    pub npk: Field,
    pub token: TokenId,
    pub value: Amount,
}

/// a leaf as delivered by the chain event source (§3, §6)
#[derive(Clone, Debug)]
pub enum Commitment {
    /// fully encrypted; the scanner must derive a shared key via ECDH on
    /// `ephemeral_keys[0]` and attempt AES-GCM decryption
    Encrypted {
        header: CommitmentHeader,
        ciphertext: Ciphertext,
        ephemeral_keys: [Point; 2],
        sender_public_key: Point,
    },
    /// the note public key and value are public; only `random` is hidden,
    /// recoverable by the recipient's viewing key
    Preimage {
        header: CommitmentHeader,
        preimage: Preimage,
        encrypted_random: Ciphertext,
    },
}

impl Commitment {
    pub fn header(&self) -> &CommitmentHeader {
        match self {
            Commitment::Encrypted { header, .. } => header,
            Commitment::Preimage { header, .. } => header,
        }
    }

    pub fn hash(&self) -> Field {
        self.header().hash
    }

    pub fn txid(&self) -> [u8; 32] {
        self.header().txid
    }
}

/// one batch delivered by the chain event source (§6): `(tree,
/// startPosition, leaves)`
#[derive(Clone, Debug)]
pub struct CommitmentBatch {
    pub tree: u32,
    pub start_position: u64,
    pub leaves: Vec<Commitment>,
}
