use crate::catalog::CatalogError;

/// Errors that can occur during metadata export
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error reading or writing metadata files
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Catalog could not deliver an index
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Missing required column in a CSV index
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Malformed CSV index
    #[error("Invalid index format: {0}")]
    InvalidFormat(String),
}
