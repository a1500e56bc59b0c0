use arrow::datatypes::DataType;

/// Errors raised while reading session tables back
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// A required column is absent
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column has a different Arrow type than the table layout prescribes
    #[error("Column {column} is {found}, expected {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Type the reader needs
        expected: &'static str,
        /// Type found in the file
        found: DataType,
    },

    /// A list column holds items of the wrong type
    #[error("List items are {0}, expected Float64")]
    ListItemType(DataType),

    /// An attribute column type with no cell mapping
    #[error("Unsupported attribute column type {0}")]
    UnsupportedType(DataType),
}
