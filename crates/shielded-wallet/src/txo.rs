//! stored and in-memory TXO shapes, and balance aggregation (§3, §4.4)
//!
//! §9 distinguishes the "typed record" the scanner reads/writes from the
//! raw deserialized blob: [`StoredTxo`] is the stable wire schema (plain
//! byte vectors, bincode-serializable); [`Txo`] is the typed, field-aware
//! shape the rest of this crate and the planner operate on. Conversion
//! between them is explicit, never reflection.

use std::collections::HashMap;

use ligerito_shielded_pool::{Amount, SerializedNote, TokenId};
use serde::{Deserialize, Serialize};
use shielded_crypto::aead::Ciphertext;
use shielded_crypto::field::{self, Field};

use crate::error::{Error, Result};

/// `{tree, position, txid, spendtxid, nullifier, note}` as persisted at
/// `("wallet", walletId, chainId, tree, position)` (§3, §6)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTxo {
    pub tree: u32,
    pub position: u64,
    pub txid: Vec<u8>,
    pub spendtxid: Option<Vec<u8>>,
    pub nullifier: Vec<u8>,
    pub npk: Vec<u8>,
    pub token: Vec<u8>,
    pub value_be: Vec<u8>,
    pub encrypted_random_iv: Vec<u8>,
    pub encrypted_random_tag: Vec<u8>,
    pub encrypted_random_data: Vec<u8>,
}

impl StoredTxo {
    pub fn new(
        tree: u32,
        position: u64,
        txid: [u8; 32],
        nullifier: Field,
        serialized_note: &SerializedNote,
    ) -> Self {
        Self {
            tree,
            position,
            txid: txid.to_vec(),
            spendtxid: None,
            nullifier: field::to_bytes_be(&nullifier).to_vec(),
            npk: serialized_note.npk.to_vec(),
            token: serialized_note.token.to_vec(),
            value_be: serialized_note.value.to_be_bytes().to_vec(),
            encrypted_random_iv: serialized_note.encrypted_random.iv.to_vec(),
            encrypted_random_tag: serialized_note.encrypted_random.tag.to_vec(),
            encrypted_random_data: serialized_note
                .encrypted_random
                .data
                .first()
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn bad(&self) -> Error {
        Error::MalformedStoredTxo {
            tree: self.tree,
            position: self.position,
        }
    }

    pub fn serialized_note(&self) -> Result<SerializedNote> {
        let npk: [u8; 32] = self.npk.clone().try_into().map_err(|_| self.bad())?;
        let token: [u8; 20] = self.token.clone().try_into().map_err(|_| self.bad())?;
        let value_be: [u8; 16] = self.value_be.clone().try_into().map_err(|_| self.bad())?;
        let iv: [u8; 12] = self
            .encrypted_random_iv
            .clone()
            .try_into()
            .map_err(|_| self.bad())?;
        let tag: [u8; 16] = self
            .encrypted_random_tag
            .clone()
            .try_into()
            .map_err(|_| self.bad())?;
        Ok(SerializedNote {
            npk,
            token,
            value: u128::from_be_bytes(value_be),
            encrypted_random: Ciphertext {
                iv,
                tag,
                data: vec![self.encrypted_random_data.clone()],
            },
        })
    }

    pub fn txid_array(&self) -> Result<[u8; 32]> {
        self.txid.clone().try_into().map_err(|_| self.bad())
    }

    pub fn spendtxid_array(&self) -> Result<Option<[u8; 32]>> {
        self.spendtxid
            .as_ref()
            .map(|v| v.clone().try_into().map_err(|_| self.bad()))
            .transpose()
    }

    pub fn nullifier_field(&self) -> Field {
        field::from_bytes_be_mod_order(&self.nullifier)
    }
}

/// the typed, in-memory view of a discovered note (§3 "Stored TXO")
#[derive(Clone, Debug)]
pub struct Txo {
    pub tree: u32,
    pub position: u64,
    pub txid: [u8; 32],
    pub spendtxid: Option<[u8; 32]>,
    pub nullifier: Field,
    pub npk: Field,
    pub token: TokenId,
    pub value: Amount,
}

impl Txo {
    /// `true` iff a nullifier match has been observed on-chain
    pub fn is_spent(&self) -> bool {
        self.spendtxid.is_some()
    }

    pub fn from_stored(stored: &StoredTxo) -> Result<Self> {
        let serialized = stored.serialized_note()?;
        Ok(Self {
            tree: stored.tree,
            position: stored.position,
            txid: stored.txid_array()?,
            spendtxid: stored.spendtxid_array()?,
            nullifier: stored.nullifier_field(),
            npk: field::from_bytes_be_mod_order(&serialized.npk),
            token: TokenId(serialized.token),
            value: Amount(serialized.value),
        })
    }
}

/// `{ balance, utxos }` for a single token within a tree (or across trees)
#[derive(Clone, Debug, Default)]
pub struct TreeBalance {
    pub balance: Amount,
    pub utxos: Vec<Txo>,
}

impl TreeBalance {
    fn push(&mut self, txo: Txo) {
        self.balance = self.balance.saturating_add(txo.value);
        self.utxos.push(txo);
    }
}

/// token → aggregate balance across every tree on a chain
pub type Balances = HashMap<TokenId, TreeBalance>;

/// token → per-tree balance list, indexed by tree
pub type BalancesByTree = HashMap<TokenId, HashMap<u32, TreeBalance>>;

/// aggregate unspent TXOs into [`Balances`] (§4.4 `balances`)
pub fn aggregate_balances(unspent: impl IntoIterator<Item = Txo>) -> Balances {
    let mut out: Balances = HashMap::new();
    for txo in unspent {
        out.entry(txo.token).or_default().push(txo);
    }
    out
}

/// aggregate unspent TXOs into [`BalancesByTree`] (§4.4 `balancesByTree`)
pub fn aggregate_balances_by_tree(unspent: impl IntoIterator<Item = Txo>) -> BalancesByTree {
    let mut out: BalancesByTree = HashMap::new();
    for txo in unspent {
        out.entry(txo.token)
            .or_default()
            .entry(txo.tree)
            .or_default()
            .push(txo);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txo(tree: u32, position: u64, token: [u8; 20], value: u128) -> Txo {
        Txo {
            tree,
            position,
            txid: [position as u8; 32],
            spendtxid: None,
            nullifier: Field::from(position),
            npk: Field::from(position),
            token: TokenId(token),
            value: Amount(value),
        }
    }

    #[test]
    fn aggregate_sums_per_token() {
        let t = [1u8; 20];
        let balances = aggregate_balances(vec![txo(0, 0, t, 30), txo(0, 1, t, 70)]);
        assert_eq!(balances[&TokenId(t)].balance, Amount(100));
        assert_eq!(balances[&TokenId(t)].utxos.len(), 2);
    }

    #[test]
    fn aggregate_by_tree_partitions() {
        let t = [2u8; 20];
        let balances = aggregate_balances_by_tree(vec![txo(0, 0, t, 10), txo(1, 0, t, 20)]);
        let per_tree = &balances[&TokenId(t)];
        assert_eq!(per_tree[&0].balance, Amount(10));
        assert_eq!(per_tree[&1].balance, Amount(20));
    }

    #[test]
    fn stored_txo_roundtrips_through_bincode() {
        use ligerito_shielded_pool::{Address, Note};

        let addr = Address::new(Field::from(1u64), [9u8; 32], Some(1));
        let note = Note::new(&addr, [4u8; 16], 555, &[7u8; 20]);
        let serialized = note.serialize(&[1u8; 32]).unwrap();
        let stored = StoredTxo::new(0, 5, [3u8; 32], Field::from(42u64), &serialized);

        let bytes = stored.encode().unwrap();
        let decoded = StoredTxo::decode(&bytes).unwrap();
        let txo = Txo::from_stored(&decoded).unwrap();

        assert_eq!(txo.tree, 0);
        assert_eq!(txo.position, 5);
        assert_eq!(txo.value, Amount(555));
        assert_eq!(txo.token, TokenId([7u8; 20]));
        assert!(!txo.is_spent());
    }
}
