//! Key-value backends
//!
//! Any engine offering put/get/delete/batch/exists can sit under a
//! [`LeafStore`](crate::LeafStore). Batches must become visible to readers
//! all at once.

use crate::error::{Result, StoreError};
use parking_lot::RwLock;
use sled::Db;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Capabilities a leaf store needs from its backend
///
/// Implementations are shared across threads.
pub trait KvBackend: Send + Sync {
    /// Insert or overwrite `key`
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Value under `key`, `None` when absent
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Remove `key`; `StoreError::NotFound` when it was absent
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Insert every pair atomically with respect to readers
    fn batch_put(&self, pairs: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()>;

    /// Whether `key` is present
    fn exists(&self, key: &[u8]) -> Result<bool>;

    /// Every key starting with `prefix`, in key order
    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Make prior writes durable
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Embedded sled database
#[derive(Clone)]
pub struct SledBackend {
    db: Db,
}

impl SledBackend {
    /// Open or create a database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        debug!(path = %path.display(), "opened sled backend");
        Ok(Self { db })
    }

    /// Database removed when the last handle drops
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl KvBackend for SledBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|value| value.to_vec()))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        match self.db.remove(key)? {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(key)),
        }
    }

    fn batch_put(&self, pairs: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for (key, value) in pairs {
            batch.insert(key, value);
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        Ok(self.db.contains_key(key)?)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        for key in self.db.scan_prefix(prefix).keys() {
            keys.push(key?.to_vec());
        }
        Ok(keys)
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Ordered in-memory map, mainly for tests and ephemeral use
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvBackend for MemoryBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        match self.entries.write().remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(key)),
        }
    }

    fn batch_put(&self, pairs: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()> {
        // One write section: readers see all pairs or none
        let mut entries = self.entries.write();
        entries.extend(pairs);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        Ok(self.entries.read().contains_key(key))
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries
            .range(prefix.to_vec()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
