//! the wallet scan engine (§4.4, §5)

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use ligerito_shielded_pool::{Address, Note, SerializedNote};
use shielded_crypto::babyjubjub::{self, SigningKey};
use shielded_crypto::ed25519::EdSigningKey;
use shielded_crypto::field::{self, Field};
use shielded_merkle_tree::MerkleTree;
use shielded_kv::Kv;

use crate::chain_source::{LeafSource, NullifierIndex};
use crate::commitment::Commitment;
use crate::constants::ChainId;
use crate::details::{WalletDetails, WalletRecord};
use crate::error::{Error, Result};
use crate::events::{ScannedEvent, DEFAULT_EVENT_CAPACITY};
use crate::identity;
use crate::txo::{aggregate_balances, aggregate_balances_by_tree, Balances, BalancesByTree, StoredTxo, Txo};

/// `("wallet", walletId)` (§6): the top-level, canonical wallet record
fn wallet_record_key(wallet_id: &[u8; 32]) -> Vec<String> {
    vec!["wallet".to_string(), shielded_kv::key::hash32(wallet_id)]
}

fn wallet_namespace(wallet_id: &[u8; 32], chain: ChainId) -> Vec<String> {
    vec![
        "wallet".to_string(),
        shielded_kv::key::hash32(wallet_id),
        shielded_kv::key::numeric(chain),
    ]
}

fn txo_key(wallet_id: &[u8; 32], chain: ChainId, tree: u32, position: u64) -> Vec<String> {
    let mut key = wallet_namespace(wallet_id, chain);
    key.push(shielded_kv::key::numeric(tree as u64));
    key.push(shielded_kv::key::numeric(position));
    key
}

fn details_key(wallet_id: &[u8; 32], chain: ChainId) -> Vec<String> {
    wallet_namespace(wallet_id, chain)
}

/// a wallet bound to a viewing/spending keypair, a KV store, one
/// [`MerkleTree`] per chain it scans, and the two external collaborators
/// named in §6 (a leaf source and a nullifier index)
pub struct Wallet<K, L, N> {
    kv: Arc<K>,
    leaf_source: Arc<L>,
    nullifier_index: Arc<N>,
    wallet_id: [u8; 32],
    mnemonic_seed: Vec<u8>,
    index: u32,
    spending_key: SigningKey,
    viewing_key: EdSigningKey,
    master_public_key: Field,
    nullifying_key: Field,
    trees: HashMap<ChainId, Arc<MerkleTree<K>>>,
    scan_locks: Mutex<HashMap<ChainId, Arc<Mutex<()>>>>,
    events: broadcast::Sender<ScannedEvent>,
}

impl<K: Kv, L: LeafSource, N: NullifierIndex> Wallet<K, L, N> {
    pub fn new(
        kv: Arc<K>,
        leaf_source: Arc<L>,
        nullifier_index: Arc<N>,
        mnemonic_seed: &[u8],
        index: u32,
        spending_key: SigningKey,
        viewing_key: EdSigningKey,
    ) -> Result<Self> {
        let wallet_id = identity::wallet_id(mnemonic_seed, index);
        let master_public_key = identity::master_public_key(&spending_key, &viewing_key)?;
        let nullifying_key = identity::nullifying_key(&viewing_key)?;
        let (events, _rx) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Ok(Self {
            kv,
            leaf_source,
            nullifier_index,
            wallet_id,
            mnemonic_seed: mnemonic_seed.to_vec(),
            index,
            spending_key,
            viewing_key,
            master_public_key,
            nullifying_key,
            trees: HashMap::new(),
            scan_locks: Mutex::new(HashMap::new()),
            events,
        })
    }

    /// persist the canonical `("wallet", walletId)` record (§6), encrypted
    /// under a user-supplied key (distinct from `masterPublicKey`, which
    /// encrypts [`WalletDetails`] instead).
    pub async fn write(&self, user_key: &[u8; 32]) -> Result<()> {
        let record = WalletRecord {
            mnemonic_seed: self.mnemonic_seed.clone(),
            index: self.index,
        };
        self.kv
            .put_encrypted(&wallet_record_key(&self.wallet_id), user_key, record.encode()?)
            .await?;
        Ok(())
    }

    /// load the `("wallet", walletId)` record written by [`Self::write`]
    pub async fn load_record(kv: &K, wallet_id: &[u8; 32], user_key: &[u8; 32]) -> Result<WalletRecord> {
        let bytes = kv
            .get_encrypted(&wallet_record_key(wallet_id), user_key)
            .await?
            .ok_or_else(|| Error::MissingData(format!("no wallet record for {}", hex::encode(wallet_id))))?;
        WalletRecord::decode(&bytes)
    }

    /// wire in the [`MerkleTree`] this wallet scans for `chain`; the
    /// merkle tree itself is shared with (and fed by) the chain event
    /// source, which queues leaves into it independently of this wallet
    pub fn register_tree(&mut self, chain: ChainId, tree: Arc<MerkleTree<K>>) {
        self.trees.insert(chain, tree);
    }

    pub fn wallet_id(&self) -> [u8; 32] {
        self.wallet_id
    }

    pub fn master_public_key(&self) -> Field {
        self.master_public_key
    }

    fn viewing_public_key_bytes(&self) -> [u8; 32] {
        self.viewing_key.verifying_key().to_bytes()
    }

    /// this wallet's receiving address (§3)
    pub fn address(&self, chain_id: Option<u64>) -> Result<Address> {
        Ok(Address::new(
            self.master_public_key,
            self.viewing_public_key_bytes(),
            chain_id,
        ))
    }

    /// subscribe to `scanned` events (§5)
    pub fn subscribe(&self) -> broadcast::Receiver<ScannedEvent> {
        self.events.subscribe()
    }

    fn nullifier_for(&self, position: u64) -> Result<Field> {
        Ok(ligerito_shielded_pool::nullifier(
            self.nullifying_key,
            position,
        )?)
    }

    /// attempt decryption of one commitment; `Ok(None)` means "not
    /// addressed to us" (§7 `NotAddressedToUs`), never an error
    fn attempt_decrypt(&self, commitment: &Commitment) -> Result<Option<SerializedNote>> {
        match commitment {
            Commitment::Encrypted {
                ciphertext,
                ephemeral_keys,
                ..
            } => {
                let viewing_scalar = identity::viewing_private_key_field(&self.viewing_key);
                let shared_point = babyjubjub::ecdh(&viewing_scalar, &ephemeral_keys[0]);
                let shared_key = babyjubjub::derive_shared_key(&shared_point);

                match Note::decrypt(ciphertext, &shared_key) {
                    Ok(partial) => {
                        let note = partial.rebind(self.viewing_public_key_bytes());
                        let serialized = note.serialize(&self.viewing_key.seed())?;
                        Ok(Some(serialized))
                    }
                    Err(err) => {
                        debug!(error = %err, "leaf not addressed to this wallet");
                        Ok(None)
                    }
                }
            }
            Commitment::Preimage {
                preimage,
                encrypted_random,
                ..
            } => {
                let stub = SerializedNote {
                    npk: field::to_bytes_be(&preimage.npk),
                    token: preimage.token.to_bytes(),
                    value: preimage.value.0,
                    encrypted_random: encrypted_random.clone(),
                };
                match Note::deserialize(&stub, &self.viewing_key.seed()) {
                    Ok(_) => Ok(Some(stub)),
                    Err(err) => {
                        debug!(error = %err, "preimage leaf not addressed to this wallet");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// `scanLeaves(leaves, tree, chain)` (§4.4): attempts decryption of
    /// every leaf and persists a [`StoredTxo`] for each one that is ours.
    /// returns whether any leaf was claimed.
    pub async fn scan_leaves(
        &self,
        chain: ChainId,
        tree: u32,
        leaves: &[(u64, Commitment)],
    ) -> Result<bool> {
        let mut claimed_any = false;
        for (position, commitment) in leaves {
            let Some(serialized) = self.attempt_decrypt(commitment)? else {
                continue;
            };
            let nullifier = self.nullifier_for(*position)?;
            let stored = StoredTxo::new(tree, *position, commitment.txid(), nullifier, &serialized);
            self.kv
                .put(
                    &txo_key(&self.wallet_id, chain, tree, *position),
                    stored.encode()?,
                )
                .await?;
            claimed_any = true;
        }
        Ok(claimed_any)
    }

    async fn load_details(&self, chain: ChainId) -> Result<WalletDetails> {
        let key = details_key(&self.wallet_id, chain);
        let enc_key = field::to_bytes_be(&self.master_public_key);
        match self.kv.get_encrypted(&key, &enc_key).await? {
            Some(bytes) => Ok(WalletDetails::decode(&bytes)?),
            None => Ok(WalletDetails::default()),
        }
    }

    async fn save_details(&self, chain: ChainId, details: &WalletDetails) -> Result<()> {
        let key = details_key(&self.wallet_id, chain);
        let enc_key = field::to_bytes_be(&self.master_public_key);
        self.kv
            .put_encrypted(&key, &enc_key, details.encode()?)
            .await?;
        Ok(())
    }

    async fn scan_lock(&self, chain: ChainId) -> Arc<Mutex<()>> {
        self.scan_locks
            .lock()
            .await
            .entry(chain)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// `scan(chain)` (§4.4, §5): walks `trees` in the given order,
    /// re-examining every leaf the chain has for each one (§9: the
    /// source rescans unconditionally rather than resuming from
    /// `treeScannedHeights`; idempotent persistence absorbs the
    /// redundant work). a concurrent call on the same chain is a no-op.
    pub async fn scan(&self, chain: ChainId, trees: &[u32]) -> Result<()> {
        let lock = self.scan_lock(chain).await;
        let Ok(_guard) = lock.try_lock() else {
            debug!(chain, "scan already in progress; skipping");
            return Ok(());
        };

        let merkle = self
            .trees
            .get(&chain)
            .ok_or_else(|| Error::MissingData(format!("no merkle tree registered for chain {chain}")))?;
        let mut details = self.load_details(chain).await?;

        for &tree in trees {
            let current_length = merkle.get_tree_length(tree).await?;
            if current_length == 0 {
                continue;
            }

            let batch = self
                .leaf_source
                .leaves(chain, tree, 0, current_length)
                .await?;
            let leaves: Vec<(u64, Commitment)> = batch
                .leaves
                .into_iter()
                .enumerate()
                .map(|(i, c)| (batch.start_position + i as u64, c))
                .collect();
            self.scan_leaves(chain, tree, &leaves).await?;

            details.record_scan(tree, leaves.len());
            self.save_details(chain, &details).await?;

            let scanned_height = details.scanned_height(tree);
            info!(chain, tree, scanned_height, "scanned");
            let _ = self.events.send(ScannedEvent {
                chain,
                tree,
                scanned_height,
            });
        }

        Ok(())
    }

    /// `TXOs(chain)` (§4.4): every persisted TXO for this wallet on
    /// `chain`, with spend status refreshed against the nullifier index
    pub async fn txos(&self, chain: ChainId) -> Result<Vec<Txo>> {
        let prefix = wallet_namespace(&self.wallet_id, chain);
        let keys: Vec<_> = self.kv.stream_namespace(&prefix).await.collect().await;

        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(bytes) = self.kv.get(&key).await? else {
                continue;
            };
            let mut stored = StoredTxo::decode(&bytes)?;

            if stored.spendtxid.is_none() {
                let nullifier = stored.nullifier_field();
                if let Some(spendtxid) = self
                    .nullifier_index
                    .get_nullified(chain, nullifier)
                    .await?
                {
                    stored.spendtxid = Some(spendtxid.to_vec());
                    self.kv.put(&key, stored.encode()?).await?;
                }
            }

            out.push(Txo::from_stored(&stored)?);
        }
        Ok(out)
    }

    /// `balances(chain)` (§4.4)
    pub async fn balances(&self, chain: ChainId) -> Result<Balances> {
        let unspent = self.txos(chain).await?.into_iter().filter(|t| !t.is_spent());
        Ok(aggregate_balances(unspent))
    }

    /// `balancesByTree(chain)` (§4.4)
    pub async fn balances_by_tree(&self, chain: ChainId) -> Result<BalancesByTree> {
        let unspent = self.txos(chain).await?.into_iter().filter(|t| !t.is_spent());
        Ok(aggregate_balances_by_tree(unspent))
    }
}
