//! Error taxonomy for tree building, mapping and root artifacts

use std::path::PathBuf;

/// Errors produced by hashtree-core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tree build or verification requested with zero leaves
    #[error("cannot build a hash tree from an empty leaf sequence")]
    EmptyInput,

    /// Mapped file is larger than the configured ceiling
    #[error("{} is {size} bytes, exceeding the mapping limit of {limit} bytes", .path.display())]
    SizeLimitExceeded {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Open/stat/map or root-file failure
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected configuration value (previous value is retained)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Root artifact does not hold exactly one digest
    #[error("root artifact is {len} bytes, expected 32")]
    CorruptRoot { len: usize },

    /// Malformed digest text or slice
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type used throughout hashtree-core
pub type Result<T> = std::result::Result<T, Error>;
