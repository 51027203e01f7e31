//! persisted wallet state (§3 `WalletDetails`, §6 persistence layout)

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `{ treeScannedHeights }` — highest scanned leaf index per tree,
/// persisted encrypted under the wallet's master public key at
/// `("wallet", walletId, chainId)`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WalletDetails {
    pub tree_scanned_heights: Vec<u64>,
}

impl WalletDetails {
    pub fn scanned_height(&self, tree: u32) -> u64 {
        self.tree_scanned_heights
            .get(tree as usize)
            .copied()
            .unwrap_or(0)
    }

    /// §9 open question: the source sets `treeScannedHeights[tree] =
    /// max(0, leaves.length - 1)` after a scan, which undercounts by one
    /// relative to "number of leaves scanned" whenever `leaves` is
    /// non-empty. Reproduced as-is rather than silently corrected.
    pub fn record_scan(&mut self, tree: u32, leaves_len: usize) {
        if self.tree_scanned_heights.len() <= tree as usize {
            self.tree_scanned_heights.resize(tree as usize + 1, 0);
        }
        let height = leaves_len.saturating_sub(1) as u64;
        self.tree_scanned_heights[tree as usize] = height;
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// the on-disk shape at `("wallet", walletId)`: `{ mnemonic, index }`,
/// encrypted under a user-supplied key (§6). BIP-39 mnemonic handling
/// itself is external (§1); this crate only owns the envelope shape.
/// written by [`crate::Wallet::write`], read back by
/// [`crate::Wallet::load_record`].
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub mnemonic_seed: Vec<u8>,
    pub index: u32,
}

impl WalletRecord {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// a corrupt record is never a generic codec failure to the caller:
    /// it means the canonical `("wallet", walletId)` envelope itself is
    /// broken, so this surfaces as `MalformedWalletRecord` (§9 open
    /// question #1: treat the `Wallet::write` shape as canonical).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|_| Error::MalformedWalletRecord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_scan_reproduces_off_by_one() {
        let mut details = WalletDetails::default();
        details.record_scan(0, 5);
        assert_eq!(details.scanned_height(0), 4);
    }

    #[test]
    fn scanned_height_defaults_to_zero_for_unknown_tree() {
        let details = WalletDetails::default();
        assert_eq!(details.scanned_height(7), 0);
    }

    #[test]
    fn wallet_record_roundtrips_through_bincode() {
        let record = WalletRecord {
            mnemonic_seed: b"test seed".to_vec(),
            index: 3,
        };
        let bytes = record.encode().unwrap();
        let decoded = WalletRecord::decode(&bytes).unwrap();
        assert_eq!(decoded.mnemonic_seed, record.mnemonic_seed);
        assert_eq!(decoded.index, 3);
    }

    #[test]
    fn wallet_record_decode_rejects_garbage() {
        let err = WalletRecord::decode(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, Error::MalformedWalletRecord));
    }
}
