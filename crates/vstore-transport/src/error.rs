use vstore_store::StoreError;

/// Errors surfaced by the transport.
///
/// Unknown classes, missing codecs and unconvertible records are not errors:
/// they are logged and yield empty or shortened results.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The builder was not given a required store handle.
    #[error("cannot create transport: {0} is required")]
    MissingStore(&'static str),

    /// The store handle exists but cannot serve queries yet.
    #[error("cannot create transport: store is not ready yet")]
    StoreNotReady,

    /// The configuration document could not be parsed.
    #[error("invalid transport configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A store query failed. Passed through unmodified.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
