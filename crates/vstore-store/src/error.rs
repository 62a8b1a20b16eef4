use vstore_types::{ClassId, EntityId};

/// Errors from object store queries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store connection has not finished initializing.
    #[error("store is not ready")]
    NotReady,

    /// The backend could not be reached or rejected the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A write referenced a class that does not exist.
    #[error("unknown class: {0}")]
    UnknownClass(ClassId),

    /// An update targeted an entity that does not exist.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
