//! HD key derivation (external collaborator)
//!
//! §1 scopes BIP-39 mnemonic handling and the generic BIP-32 derivation
//! algorithm out of THE CORE; this crate only owns the two fixed path
//! prefixes (`crate::constants`) that pick which subtrees to derive from.
//! Concrete derivation is reached through this trait so the scan engine
//! and the key layer never depend on a specific HD implementation.

use shielded_crypto::babyjubjub::SigningKey;
use shielded_crypto::ed25519::EdSigningKey;

use crate::Result;

/// derives spending/viewing keys from a BIP-39 seed along a hardened path
pub trait HdDeriver: Send + Sync {
    /// derive a BabyJubJub spending key at `path` (§4.4 spending subtree)
    fn derive_spending_key(&self, seed: &[u8], path: &str) -> Result<SigningKey>;

    /// derive an Ed25519 viewing key at `path` (§4.4 viewing subtree)
    fn derive_viewing_key(&self, seed: &[u8], path: &str) -> Result<EdSigningKey>;
}
