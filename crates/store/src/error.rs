//! Leaf store errors

/// Errors produced by the leaf store and its backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key absent from the backend
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// Storage fault reported by sled
    #[error("storage backend error")]
    Backend(#[from] sled::Error),

    /// Rebuilding the tree from stored leaves failed
    #[error("tree error")]
    Tree(#[from] hashtree_core::Error),
}

impl StoreError {
    pub(crate) fn not_found(key: &[u8]) -> Self {
        StoreError::NotFound {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    /// True when the error only reports an absent key
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for leaf store operations
pub type Result<T> = std::result::Result<T, StoreError>;
