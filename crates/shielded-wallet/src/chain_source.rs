//! external collaborators the scan engine is written against (§1, §6)
//!
//! the chain RPC client and the nullifier-index backend live outside THE
//! CORE; these traits are the named interfaces §1 says THE CORE treats
//! them through.

use async_trait::async_trait;
use shielded_crypto::field::Field;

use crate::commitment::CommitmentBatch;
use crate::constants::ChainId;
use crate::error::Result;

/// delivers the full leaf data (ciphertext/preimage, not just the
/// Poseidon commitment the merkle tree stores) for positions the wallet
/// has not yet scanned. §6: "the scanner treats the source as
/// authoritative and idempotent per (tree, position)".
#[async_trait]
pub trait LeafSource: Send + Sync {
    /// every leaf in `tree` at position `>= from_position` and `<
    /// up_to`, in ascending position order, as the `(tree, startPosition,
    /// leaves)` batch shape of §6
    async fn leaves(
        &self,
        chain: ChainId,
        tree: u32,
        from_position: u64,
        up_to: u64,
    ) -> Result<CommitmentBatch>;
}

/// `getNullified(nullifier) → Option<txid>` (§6)
#[async_trait]
pub trait NullifierIndex: Send + Sync {
    async fn get_nullified(&self, chain: ChainId, nullifier: Field) -> Result<Option<[u8; 32]>>;
}
