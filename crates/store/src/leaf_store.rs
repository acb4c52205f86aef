//! Leaf persistence over a key-value backend

use crate::backend::KvBackend;
use crate::error::{Result, StoreError};
use crate::keys::{leaf_key, signature_key, LEAF_PREFIX};
use hashtree_core::{Digest, HashAlgorithm, TreeBuilder};
use tracing::{debug, info};

/// Stores leaves by position and signatures by content
///
/// The digest algorithm derives signature keys and is used when stored
/// leaves are re-verified against a root.
pub struct LeafStore<B> {
    backend: B,
    algorithm: HashAlgorithm,
}

impl<B: KvBackend> LeafStore<B> {
    /// Wrap a backend, hashing with SHA-256
    pub fn new(backend: B) -> Self {
        Self::with_algorithm(backend, HashAlgorithm::default())
    }

    /// Wrap a backend with an explicit digest algorithm
    pub fn with_algorithm(backend: B, algorithm: HashAlgorithm) -> Self {
        Self { backend, algorithm }
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Digest algorithm in use
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Store each leaf under `leaf-<index>` with one put per leaf
    ///
    /// Returns the number of leaves written.
    pub fn store_leaves<I, L>(&self, leaves: I) -> Result<usize>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut count = 0;
        for (index, leaf) in leaves.into_iter().enumerate() {
            self.backend
                .put(leaf_key(index).as_bytes(), leaf.as_ref())?;
            count += 1;
        }
        debug!(count, "stored leaves");
        Ok(count)
    }

    /// Store the same keys as `store_leaves` in a single atomic batch
    pub fn store_leaves_batch<I, L>(&self, leaves: I) -> Result<usize>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = leaves
            .into_iter()
            .enumerate()
            .map(|(index, leaf)| (leaf_key(index).into_bytes(), leaf.as_ref().to_vec()))
            .collect();

        let count = pairs.len();
        self.backend.batch_put(pairs)?;
        debug!(count, "stored leaf batch");
        Ok(count)
    }

    /// Fetch the bytes stored under `key`
    ///
    /// # Errors
    /// * `StoreError::NotFound` - nothing stored under `key`
    /// * `StoreError::Backend` - storage fault
    pub fn fetch_leaf(&self, key: &str) -> Result<Vec<u8>> {
        self.backend
            .get(key.as_bytes())?
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    /// Fetch the leaf at a position
    pub fn fetch_leaf_at(&self, index: usize) -> Result<Vec<u8>> {
        self.fetch_leaf(&leaf_key(index))
    }

    /// Whether a signature with this content has been saved
    pub fn check_signature_exists(&self, signature: &[u8]) -> Result<bool> {
        let key = signature_key(&self.algorithm.digest(signature));
        self.backend.exists(key.as_bytes())
    }

    /// Save a signature under its content-derived key
    ///
    /// Not write-once: saving the same content again rewrites identical bytes.
    pub fn save_signature(&self, signature: &[u8]) -> Result<()> {
        let key = signature_key(&self.algorithm.digest(signature));
        self.backend.put(key.as_bytes(), signature)?;
        debug!(key = %key, "saved signature");
        Ok(())
    }

    /// Save a signature unless it is already present
    ///
    /// Returns `true` when the signature was new. The check and the save are
    /// separate backend calls.
    pub fn save_signature_if_new(&self, signature: &[u8]) -> Result<bool> {
        if self.check_signature_exists(signature)? {
            return Ok(false);
        }
        self.save_signature(signature)?;
        Ok(true)
    }

    /// Delete `leaf-0 .. leaf-(count-1)`
    ///
    /// Absent keys count as already pruned. Returns how many keys were
    /// actually removed.
    pub fn prune_leaves(&self, count: usize) -> Result<usize> {
        let mut removed = 0;
        for index in 0..count {
            match self.backend.delete(leaf_key(index).as_bytes()) {
                Ok(()) => removed += 1,
                Err(StoreError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        info!(requested = count, removed, "pruned leaves");
        Ok(removed)
    }

    /// Delete every positional leaf, including any left behind a pruned
    /// prefix. Signatures are kept.
    pub fn clear_leaves(&self) -> Result<usize> {
        let mut removed = 0;
        for key in self.backend.keys_with_prefix(LEAF_PREFIX.as_bytes())? {
            match self.backend.delete(&key) {
                Ok(()) => removed += 1,
                Err(StoreError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        debug!(removed, "cleared leaves");
        Ok(removed)
    }

    /// Read `leaf-0, leaf-1, ...` up to the first missing index
    pub fn load_leaves(&self) -> Result<Vec<Vec<u8>>> {
        let mut leaves = Vec::new();
        loop {
            match self.fetch_leaf_at(leaves.len()) {
                Ok(leaf) => leaves.push(leaf),
                Err(StoreError::NotFound { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        debug!(count = leaves.len(), "loaded leaves");
        Ok(leaves)
    }

    /// Rebuild the tree from stored leaves and compare with `expected_root`
    ///
    /// An empty store fails with the builder's `EmptyInput` error.
    pub fn verify_root(&self, expected_root: &Digest) -> Result<bool> {
        let leaves = self.load_leaves()?;
        let matches = TreeBuilder::new(self.algorithm).verify(&leaves, expected_root)?;
        info!(leaves = leaves.len(), matches, "verified stored leaves");
        Ok(matches)
    }

    /// Flush the backend
    pub fn flush(&self) -> Result<()> {
        self.backend.flush()
    }
}
