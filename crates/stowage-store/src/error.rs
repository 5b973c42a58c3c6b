use stowage_types::{Target, TypeError};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert carried no columns.
    #[error("cannot insert an empty record into {0}")]
    EmptyRecord(Target),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,

    /// Value-model error (invalid target, non-record serialization).
    #[error(transparent)]
    Type(#[from] TypeError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
