//! Splitting contiguous bytes into leaf blocks

use crate::error::{Error, Result};

/// Default leaf size used when ingesting files (4 KiB)
pub const DEFAULT_LEAF_SIZE: usize = 4096;

/// Split `data` into consecutive leaves of `leaf_size` bytes
///
/// The final leaf may be shorter. Empty input yields no leaves, which the
/// tree builder then rejects.
pub fn split_leaves(data: &[u8], leaf_size: usize) -> Result<Vec<&[u8]>> {
    if leaf_size == 0 {
        return Err(Error::InvalidConfiguration(
            "leaf size must be greater than zero".to_string(),
        ));
    }
    Ok(data.chunks(leaf_size).collect())
}
