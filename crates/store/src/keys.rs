//! Keyspace conventions
//!
//! - `leaf-<decimal index>` holds a leaf by position
//! - `signature-<lowercase hex digest>` holds a signature by content

use hashtree_core::Digest;

/// Prefix of positional leaf keys
pub const LEAF_PREFIX: &str = "leaf-";

/// Prefix of content-addressed signature keys
pub const SIGNATURE_PREFIX: &str = "signature-";

/// Positional key for the leaf at `index`
pub fn leaf_key(index: usize) -> String {
    format!("{}{}", LEAF_PREFIX, index)
}

/// Content-addressed key for a signature digest
pub fn signature_key(digest: &Digest) -> String {
    format!("{}{}", SIGNATURE_PREFIX, digest.to_hex())
}
