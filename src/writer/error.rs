/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library during file writing
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// A column does not match the table's row count
    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        /// Column name
        column: String,
        /// Row count of the table
        expected: usize,
        /// Length of the column
        found: usize,
    },

    /// Invalid data provided to the writer
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
