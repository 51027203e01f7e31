//! the append-only commitment tree (§4.2)

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use shielded_crypto::field::{self, Field};
use shielded_crypto::poseidon::hash_left_right;
use shielded_kv::{key, BatchOp, Kv};
use tokio::sync::Mutex;

use crate::{Error, Result};

struct QueuedBatch {
    starting_index: u64,
    leaves: Vec<Field>,
}

/// an append-only, fixed-depth Poseidon-hashed tree family, namespaced by
/// `(chainId, purpose)`, holding many independent trees indexed by `tree`
pub struct MerkleTree<K> {
    kv: Arc<K>,
    chain_id: u64,
    purpose: String,
    depth: u32,
    zero_values: Vec<Field>,
    lengths: Mutex<HashMap<u32, u64>>,
    queues: Mutex<HashMap<u32, VecDeque<QueuedBatch>>>,
    queue_lock: Mutex<()>,
}

impl<K: Kv> MerkleTree<K> {
    pub fn new(kv: Arc<K>, chain_id: u64, purpose: impl Into<String>, depth: u32) -> Result<Self> {
        Ok(Self {
            kv,
            chain_id,
            purpose: purpose.into(),
            depth,
            zero_values: crate::zero_values::compute(depth)?,
            lengths: Mutex::new(HashMap::new()),
            queues: Mutex::new(HashMap::new()),
            queue_lock: Mutex::new(()),
        })
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// `Poseidon(l, r)`
    pub fn hash_left_right(l: Field, r: Field) -> Result<Field> {
        Ok(hash_left_right(l, r)?)
    }

    fn node_key(&self, tree: u32, level: u32, index: u64) -> Vec<String> {
        vec![
            key::numeric(self.chain_id),
            key::label(&format!("merkletree-{}", self.purpose)),
            key::numeric(tree as u64),
            key::numeric(level as u64),
            key::numeric(index),
        ]
    }

    fn length_key(&self, tree: u32) -> Vec<String> {
        vec![
            key::numeric(self.chain_id),
            key::label(&format!("merkletree-{}", self.purpose)),
            key::numeric(tree as u64),
            key::label("length"),
        ]
    }

    /// returns the persisted node at `(tree, level, index)`, or
    /// `zeroValues[level]` if no node has ever been written there
    pub async fn get_node(&self, tree: u32, level: u32, index: u64) -> Result<Field> {
        match self.kv.get(&self.node_key(tree, level, index)).await? {
            Some(bytes) => Ok(field::from_bytes_be_mod_order(&bytes)),
            None => Ok(self.zero_values[level as usize]),
        }
    }

    /// `getNode(tree, depth, 0)`
    pub async fn get_root(&self, tree: u32) -> Result<Field> {
        self.get_node(tree, self.depth, 0).await
    }

    /// cached leaf count for `tree`, loading from storage on first access
    pub async fn get_tree_length(&self, tree: u32) -> Result<u64> {
        if let Some(len) = self.lengths.lock().await.get(&tree) {
            return Ok(*len);
        }
        let len = match self.kv.get(&self.length_key(tree)).await? {
            Some(bytes) if bytes.len() == 8 => {
                u64::from_be_bytes(bytes.try_into().expect("checked len"))
            }
            _ => 0,
        };
        self.lengths.lock().await.insert(tree, len);
        Ok(len)
    }

    /// enqueues a leaf batch and attempts to drive `update_trees`; returns
    /// immediately without updating if another caller already owns the
    /// update loop (§5: "a concurrent `queueLeaves` returns immediately
    /// after depositing")
    pub async fn queue_leaves(&self, tree: u32, leaves: Vec<Field>, starting_index: u64) -> Result<()> {
        self.queues
            .lock()
            .await
            .entry(tree)
            .or_default()
            .push_back(QueuedBatch {
                starting_index,
                leaves,
            });

        let Ok(_guard) = self.queue_lock.try_lock() else {
            return Ok(());
        };
        self.update_trees().await
    }

    /// drains every tree's queue, inserting each batch that has become
    /// current, until no tree can make progress
    async fn update_trees(&self) -> Result<()> {
        loop {
            let mut progressed = false;
            let tree_indices: Vec<u32> = self.queues.lock().await.keys().copied().collect();

            for tree in tree_indices {
                let current_length = self.get_tree_length(tree).await?;

                let next = {
                    let mut queues = self.queues.lock().await;
                    let Some(queue) = queues.get_mut(&tree) else {
                        continue;
                    };

                    let before = queue.len();
                    queue.retain(|batch| batch.starting_index >= current_length);
                    if queue.len() != before {
                        tracing::debug!(tree, "discarded stale queued batch");
                    }

                    let position = queue
                        .iter()
                        .position(|batch| batch.starting_index == current_length);
                    position.and_then(|pos| queue.remove(pos))
                };

                if let Some(batch) = next {
                    self.insert_leaves(tree, &batch.leaves, batch.starting_index)
                        .await?;
                    progressed = true;
                }
            }

            if !progressed {
                break;
            }
        }
        Ok(())
    }

    /// inserts leaves contiguously at `start_index`, recomputes every
    /// ancestor touched by the insertion, and commits with one batched
    /// write (§4.2 algorithm)
    pub async fn insert_leaves(&self, tree: u32, leaves: &[Field], start_index: u64) -> Result<()> {
        let current_length = self.get_tree_length(tree).await?;
        if start_index != current_length {
            return Err(Error::OutOfOrderBatch {
                tree,
                expected: current_length,
                got: start_index,
            });
        }

        let mut cache: HashMap<(u32, u64), Field> = HashMap::new();
        let mut touched: BTreeSet<u64> = BTreeSet::new();
        for (i, leaf) in leaves.iter().enumerate() {
            let index = start_index + i as u64;
            cache.insert((0, index), *leaf);
            touched.insert(index);
        }

        for level in 0..self.depth {
            let mut parents = BTreeSet::new();
            for index in &touched {
                parents.insert(index >> 1);
            }

            for &parent_index in &parents {
                let left_index = parent_index * 2;
                let right_index = left_index + 1;
                let left = self.node_for_insert(tree, level, left_index, &cache).await?;
                let right = self.node_for_insert(tree, level, right_index, &cache).await?;
                let parent = Self::hash_left_right(left, right)?;
                cache.insert((level + 1, parent_index), parent);
            }

            touched = parents;
        }

        let new_length = start_index + leaves.len() as u64;
        let mut ops: Vec<BatchOp> = cache
            .iter()
            .map(|((level, index), value)| BatchOp::Put {
                key: self.node_key(tree, *level, *index),
                value: field::to_bytes_be(value).to_vec(),
            })
            .collect();
        ops.push(BatchOp::Put {
            key: self.length_key(tree),
            value: new_length.to_be_bytes().to_vec(),
        });
        self.kv.batch(ops).await?;
        self.lengths.lock().await.insert(tree, new_length);
        Ok(())
    }

    async fn node_for_insert(
        &self,
        tree: u32,
        level: u32,
        index: u64,
        cache: &HashMap<(u32, u64), Field>,
    ) -> Result<Field> {
        if let Some(value) = cache.get(&(level, index)) {
            return Ok(*value);
        }
        self.get_node(tree, level, index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shielded_kv::MemoryKv;

    fn field(n: u64) -> Field {
        Field::from(n)
    }

    #[tokio::test]
    async fn empty_tree_root_is_depth_fold_of_zero_value() {
        let kv = Arc::new(MemoryKv::new());
        let tree = MerkleTree::new(kv, 1, "test", 4).unwrap();
        let root = tree.get_root(0).await.unwrap();
        assert_eq!(root, tree.zero_values[4]);
    }

    #[tokio::test]
    async fn single_leaf_insert_matches_manual_fold() {
        let kv = Arc::new(MemoryKv::new());
        let tree = MerkleTree::new(kv, 1, "test", 3).unwrap();
        let leaf = field(42);
        tree.insert_leaves(0, &[leaf], 0).await.unwrap();

        let mut expected = leaf;
        for level in 0..3u32 {
            expected = MerkleTree::<MemoryKv>::hash_left_right(expected, tree.zero_values[level as usize]).unwrap();
        }
        assert_eq!(tree.get_root(0).await.unwrap(), expected);
        assert_eq!(tree.get_tree_length(0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn out_of_order_batch_is_rejected_directly_but_queues() {
        let kv = Arc::new(MemoryKv::new());
        let tree = MerkleTree::new(kv, 1, "test", 4).unwrap();

        assert!(tree.insert_leaves(0, &[field(1)], 3).await.is_err());

        // queued batches for a not-yet-reached index are held, not dropped,
        // until the tree catches up
        tree.queue_leaves(0, vec![field(9)], 2).await.unwrap();
        assert_eq!(tree.get_tree_length(0).await.unwrap(), 0);

        tree.queue_leaves(0, vec![field(1), field(2)], 0).await.unwrap();
        assert_eq!(tree.get_tree_length(0).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn queue_leaves_drains_multiple_trees_independently() {
        let kv = Arc::new(MemoryKv::new());
        let tree = MerkleTree::new(kv, 1, "test", 4).unwrap();

        tree.queue_leaves(0, vec![field(1)], 0).await.unwrap();
        tree.queue_leaves(1, vec![field(2), field(3)], 0).await.unwrap();

        assert_eq!(tree.get_tree_length(0).await.unwrap(), 1);
        assert_eq!(tree.get_tree_length(1).await.unwrap(), 2);
        assert_ne!(tree.get_root(0).await.unwrap(), tree.get_root(1).await.unwrap());
    }

    #[tokio::test]
    async fn stale_queue_entry_is_discarded_not_reapplied() {
        let kv = Arc::new(MemoryKv::new());
        let tree = MerkleTree::new(kv, 1, "test", 4).unwrap();

        tree.insert_leaves(0, &[field(1)], 0).await.unwrap();
        // a duplicate/stale batch claiming to start at 0 again must not
        // silently re-apply once the tree has already advanced past it
        tree.queue_leaves(0, vec![field(1)], 0).await.unwrap();
        assert_eq!(tree.get_tree_length(0).await.unwrap(), 1);
    }
}
