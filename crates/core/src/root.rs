//! Root artifact file: the raw 32-byte root digest, no header

use crate::error::{Error, Result};
use crate::hash::{Digest, DIGEST_LEN};
use std::path::Path;
use tracing::debug;

/// Truncate `path` and write the digest bytes
pub fn write_root(path: &Path, root: &Digest) -> Result<()> {
    std::fs::write(path, root.as_bytes()).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), root = %root, "wrote root artifact");
    Ok(())
}

/// Read the artifact as-is, without validating its length
pub fn read_root(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(path, e))
}

/// Read the artifact and require exactly one digest
///
/// Any other length is treated as corruption.
pub fn load_root(path: &Path) -> Result<Digest> {
    let bytes = read_root(path)?;
    if bytes.len() != DIGEST_LEN {
        return Err(Error::CorruptRoot { len: bytes.len() });
    }
    Digest::from_slice(&bytes)
}
