/// Errors raised by catalog providers
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error reading cached catalog files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed catalog or bundle JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Requested session is not in the catalog
    #[error("session {0} not found")]
    SessionNotFound(i64),

    /// Catalog file missing from the cache
    #[error("catalog file not found: {0}")]
    NotFound(String),
}
