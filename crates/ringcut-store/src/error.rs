use ringcut_types::{ContentHash, SlotKind};

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested slot is empty.
    #[error("{kind} slot not found for {hash}")]
    NotFound { kind: SlotKind, hash: ContentHash },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Returns `true` if this error reports a missing slot.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
