//! Size-limited, serialized read-only memory mapping of source files
//!
//! A [`MappedFileGuard`] owns the mapping ceiling and the lock that
//! serializes every map and unmap it performs. Each successful
//! [`MappedFileGuard::open`] hands back a [`MappedRegion`] that releases its
//! mapping exactly once, either through [`MappedRegion::close`] or when it
//! goes out of scope.
//!
//! ```compile_fail
//! use hashtree_core::MappedFileGuard;
//!
//! let guard = MappedFileGuard::default();
//! let region = guard.open("Cargo.toml").unwrap();
//! region.close();
//! // The region was consumed by `close`
//! let _ = region.len();
//! ```

use crate::chunk::split_leaves;
use crate::error::{Error, Result};
use memmap2::{Mmap, MmapOptions};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Bytes per gibibyte
pub const GIB: u64 = 1 << 30;

/// Default mapping ceiling in GiB
pub const DEFAULT_LIMIT_GIB: u64 = 1;

fn default_limit_gib() -> u64 {
    DEFAULT_LIMIT_GIB
}

/// Mapping configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Largest file that may be mapped, in GiB (default: 1)
    #[serde(default = "default_limit_gib")]
    pub limit_gib: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            limit_gib: DEFAULT_LIMIT_GIB,
        }
    }
}

impl GuardConfig {
    /// Ceiling in bytes, rejecting zero and overflowing values
    pub fn limit_bytes(&self) -> Result<u64> {
        limit_to_bytes(self.limit_gib)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.limit_bytes().map(|_| ())
    }
}

fn limit_to_bytes(gib: u64) -> Result<u64> {
    if gib == 0 {
        return Err(Error::InvalidConfiguration(
            "mapping limit must be at least 1 GiB".to_string(),
        ));
    }
    gib.checked_mul(GIB).ok_or_else(|| {
        Error::InvalidConfiguration(format!("mapping limit of {} GiB overflows", gib))
    })
}

/// Maps files read-only under a configurable size ceiling
pub struct MappedFileGuard {
    /// Ceiling in bytes
    limit: AtomicU64,
    /// Serializes map and unmap calls; shared with every region handed out
    lock: Arc<Mutex<()>>,
}

impl MappedFileGuard {
    /// Create a guard from configuration
    pub fn new(config: GuardConfig) -> Result<Self> {
        Ok(Self {
            limit: AtomicU64::new(config.limit_bytes()?),
            lock: Arc::new(Mutex::new(())),
        })
    }

    /// Current ceiling in bytes
    pub fn limit_bytes(&self) -> u64 {
        self.limit.load(Ordering::Acquire)
    }

    /// Current ceiling in GiB
    pub fn limit_gib(&self) -> u64 {
        self.limit_bytes() / GIB
    }

    /// Replace the ceiling
    ///
    /// Zero or overflowing values are rejected with
    /// `Error::InvalidConfiguration` and the current ceiling is kept.
    pub fn set_limit_gib(&self, gib: u64) -> Result<()> {
        let bytes = limit_to_bytes(gib).map_err(|e| {
            warn!(gib, current_gib = self.limit_gib(), "rejected mapping limit");
            e
        })?;
        self.limit.store(bytes, Ordering::Release);
        debug!(gib, "mapping limit updated");
        Ok(())
    }

    /// Map `path` read-only
    ///
    /// # Errors
    /// * `Error::SizeLimitExceeded` - file is larger than the ceiling
    /// * `Error::Io` - open, stat or map failed
    pub fn open(&self, path: impl AsRef<Path>) -> Result<MappedRegion> {
        let path = path.as_ref();
        let _serial = self.lock.lock();

        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let size = file.metadata().map_err(|e| Error::io(path, e))?.len();

        let limit = self.limit_bytes();
        if size > limit {
            warn!(path = %path.display(), size, limit, "file exceeds mapping limit");
            return Err(Error::SizeLimitExceeded {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }

        let mmap = if size == 0 {
            // Nothing to map; an empty region needs no release
            None
        } else {
            let len = usize::try_from(size).map_err(|_| Error::SizeLimitExceeded {
                path: path.to_path_buf(),
                size,
                limit: usize::MAX as u64,
            })?;
            // SAFETY: the mapping is read-only and its length is pinned to the
            // size checked above. Callers must not truncate the file while a
            // region over it is alive.
            let mmap = unsafe { MmapOptions::new().len(len).map(&file) }
                .map_err(|e| Error::io(path, e))?;
            Some(mmap)
        };

        // The mapping stays valid after the descriptor is closed
        drop(file);

        debug!(path = %path.display(), size, "mapped file");

        Ok(MappedRegion {
            path: path.to_path_buf(),
            mmap,
            lock: Arc::clone(&self.lock),
        })
    }

    /// Release a region obtained from `open`
    pub fn close(&self, region: MappedRegion) {
        region.close();
    }

    /// Map `path`, run `f` over the region, then release it
    pub fn with_region<T, F>(&self, path: impl AsRef<Path>, f: F) -> Result<T>
    where
        F: FnOnce(&MappedRegion) -> T,
    {
        let region = self.open(path)?;
        let out = f(&region);
        region.close();
        Ok(out)
    }
}

impl Default for MappedFileGuard {
    fn default() -> Self {
        Self {
            limit: AtomicU64::new(DEFAULT_LIMIT_GIB * GIB),
            lock: Arc::new(Mutex::new(())),
        }
    }
}

impl std::fmt::Debug for MappedFileGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFileGuard")
            .field("limit_bytes", &self.limit_bytes())
            .finish()
    }
}

/// Read-only view over a mapped file
///
/// Released exactly once: by `close` (which consumes the region) or on drop.
pub struct MappedRegion {
    path: PathBuf,
    /// `None` for empty files and after release
    mmap: Option<Mmap>,
    lock: Arc<Mutex<()>>,
}

impl MappedRegion {
    /// Path the region was mapped from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mapped bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Number of mapped bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for a zero-length file
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Split the mapped bytes into leaf blocks of `leaf_size`
    pub fn leaves(&self, leaf_size: usize) -> Result<Vec<&[u8]>> {
        split_leaves(self.as_bytes(), leaf_size)
    }

    /// Release the mapping
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let _serial = self.lock.lock();
        if let Some(mmap) = self.mmap.take() {
            let len = mmap.len();
            drop(mmap);
            debug!(path = %self.path.display(), len, "unmapped file");
        }
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        self.release();
    }
}

impl Deref for MappedRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for MappedRegion {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for MappedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegion")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}
