//! in-memory reference [`Kv`] implementation, for tests only

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use tokio::sync::RwLock;

use shielded_crypto::aead;

use crate::{key, BatchOp, Error, Key, Kv, Result};

struct Entry {
    key: Key,
    value: Vec<u8>,
}

#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn raw_put(map: &mut BTreeMap<String, Entry>, key: &[String], value: Vec<u8>) {
        map.insert(
            key::join(key),
            Entry {
                key: key.to_vec(),
                value,
            },
        );
    }
}

#[async_trait]
impl Kv for MemoryKv {
    async fn get(&self, key: &[String]) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&key::join(key))
            .map(|e| e.value.clone()))
    }

    async fn put(&self, key: &[String], value: Vec<u8>) -> Result<()> {
        Self::raw_put(&mut *self.entries.write().await, key, value);
        Ok(())
    }

    async fn get_encrypted(&self, key: &[String], enc_key: &[u8; 32]) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        if raw.len() < 28 {
            return Err(Error::DecryptionFailed);
        }
        let mut iv = [0u8; 12];
        iv.copy_from_slice(&raw[..12]);
        let mut tag = [0u8; 16];
        tag.copy_from_slice(&raw[12..28]);
        let ciphertext = aead::Ciphertext {
            iv,
            tag,
            data: vec![raw[28..].to_vec()],
        };
        let plaintext = aead::decrypt(&ciphertext, enc_key).map_err(|_| Error::DecryptionFailed)?;
        Ok(Some(plaintext.into_iter().next().unwrap_or_default()))
    }

    async fn put_encrypted(&self, key: &[String], enc_key: &[u8; 32], value: Vec<u8>) -> Result<()> {
        let ciphertext = aead::encrypt(&[&value], enc_key)
            .map_err(|e| Error::Storage(e.to_string()))?;
        let mut raw = Vec::with_capacity(28 + ciphertext.data[0].len());
        raw.extend_from_slice(&ciphertext.iv);
        raw.extend_from_slice(&ciphertext.tag);
        raw.extend_from_slice(&ciphertext.data[0]);
        self.put(key, raw).await
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> Result<()> {
        let mut map = self.entries.write().await;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => Self::raw_put(&mut map, &key, value),
                BatchOp::PutEncrypted { key, enc_key, value } => {
                    drop(map);
                    self.put_encrypted(&key, &enc_key, value).await?;
                    map = self.entries.write().await;
                }
            }
        }
        Ok(())
    }

    async fn count_namespace(&self, prefix: &[String]) -> Result<usize> {
        let p = key::join(prefix);
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(&p))
            .count())
    }

    async fn stream_namespace<'a>(&'a self, prefix: &[String]) -> BoxStream<'a, Key> {
        let p = key::join(prefix);
        let keys: Vec<Key> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(k, _)| k.starts_with(&p))
            .map(|(_, e)| e.key.clone())
            .collect();
        Box::pin(stream::iter(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_roundtrip() {
        let kv = MemoryKv::new();
        let k = vec!["wallet".to_string(), key::numeric(1)];
        kv.put(&k, b"hello".to_vec()).await.unwrap();
        assert_eq!(kv.get(&k).await.unwrap(), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn encrypted_roundtrip() {
        let kv = MemoryKv::new();
        let k = vec!["wallet".to_string(), key::numeric(7)];
        let enc_key = [9u8; 32];
        kv.put_encrypted(&k, &enc_key, b"secret details".to_vec())
            .await
            .unwrap();
        let plain = kv.get_encrypted(&k, &enc_key).await.unwrap().unwrap();
        assert_eq!(plain, b"secret details");

        let wrong_key = [1u8; 32];
        assert!(kv.get_encrypted(&k, &wrong_key).await.is_err());
    }

    #[tokio::test]
    async fn namespace_scan_and_count() {
        let kv = MemoryKv::new();
        for i in 0..5u64 {
            let k = vec!["wallet".to_string(), "w1".to_string(), key::numeric(i)];
            kv.put(&k, vec![i as u8]).await.unwrap();
        }
        let prefix = vec!["wallet".to_string(), "w1".to_string()];
        assert_eq!(kv.count_namespace(&prefix).await.unwrap(), 5);

        use futures::StreamExt;
        let keys: Vec<_> = kv.stream_namespace(&prefix).await.collect().await;
        assert_eq!(keys.len(), 5);
    }
}
