//! Hashtree Core - hash-tree commitments over ordered leaf blocks
//!
//! This crate provides:
//! - 256-bit digest primitive (SHA-256 or BLAKE3)
//! - Binary hash tree builder with odd-node carry-up
//! - Size-limited, serialized memory mapping of source files
//! - Root artifact file I/O

pub mod chunk;
pub mod error;
pub mod hash;
pub mod mmap;
pub mod root;
pub mod tree;

// Re-export main types for convenience
pub use chunk::split_leaves;
pub use error::{Error, Result};
pub use hash::{hash_bytes, Digest, HashAlgorithm, DIGEST_LEN};
pub use mmap::{GuardConfig, MappedFileGuard, MappedRegion};
pub use root::{load_root, read_root, write_root};
pub use tree::{build, verify, HashTree, NodeId, TreeBuilder, TreeNode};
