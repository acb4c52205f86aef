//! Leaf persistence for hash-tree commitments
//!
//! This crate provides:
//! - The key-value capability a backend must offer (`KvBackend`)
//! - An embedded sled backend and an in-memory backend
//! - Positional and signature keyspace conventions
//! - `LeafStore`: store, fetch, dedup, prune and re-verify leaves

pub mod backend;
pub mod error;
pub mod keys;
pub mod leaf_store;

// Re-exports
pub use backend::{KvBackend, MemoryBackend, SledBackend};
pub use error::{Result, StoreError};
pub use keys::{leaf_key, signature_key, LEAF_PREFIX, SIGNATURE_PREFIX};
pub use leaf_store::LeafStore;
