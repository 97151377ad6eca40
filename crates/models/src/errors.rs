use thiserror::Error;

/// Failures surfaced by the storage handle.
///
/// There is no retry and no fallback: whatever the driver reports is carried
/// back to the caller as text.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store never opened; carries the retained open error.
    #[error("database unavailable: {0}")]
    Unavailable(String),
    /// Query execution failed; carries the driver message as-is.
    #[error("{0}")]
    Query(String),
}
