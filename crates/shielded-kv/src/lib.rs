//! the abstract key-value contract the wallet core is written against
//!
//! §6 names the concrete backend as an external collaborator ("the
//! key-value store implementation" is out of scope). this crate defines
//! the trait every other crate codes to, plus an in-memory reference
//! implementation used by the test suites in `shielded-merkle-tree` and
//! `shielded-wallet` — it is not a production backend.

mod error;
pub mod key;
mod memory;

pub use error::{Error, Result};
pub use key::Key;
pub use memory::MemoryKv;

use async_trait::async_trait;
use futures::stream::BoxStream;

/// one write in a batch
#[derive(Clone, Debug)]
pub enum BatchOp {
    Put { key: Key, value: Vec<u8> },
    PutEncrypted { key: Key, enc_key: [u8; 32], value: Vec<u8> },
}

/// the kv contract: `get/put`, `getEncrypted/putEncrypted`, `batch`,
/// `countNamespace`, `streamNamespace`
#[async_trait]
pub trait Kv: Send + Sync {
    async fn get(&self, key: &[String]) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &[String], value: Vec<u8>) -> Result<()>;

    /// read a value that was written with [`Kv::put_encrypted`]
    async fn get_encrypted(&self, key: &[String], enc_key: &[u8; 32]) -> Result<Option<Vec<u8>>>;

    /// write a value encrypted at rest under `enc_key` (AES-256-GCM, a
    /// fresh nonce per write — see `shielded-crypto::aead`)
    async fn put_encrypted(&self, key: &[String], enc_key: &[u8; 32], value: Vec<u8>) -> Result<()>;

    /// apply a batch of writes atomically
    async fn batch(&self, ops: Vec<BatchOp>) -> Result<()>;

    /// count keys under a namespace prefix
    async fn count_namespace(&self, prefix: &[String]) -> Result<usize>;

    /// stream every key under a namespace prefix, in ascending order
    async fn stream_namespace<'a>(&'a self, prefix: &[String]) -> BoxStream<'a, Key>;
}
