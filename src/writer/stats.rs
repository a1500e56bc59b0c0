use std::fmt;

/// Statistics from a completed table write
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Number of rows written
    pub rows_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Total uncompressed row group size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows in {} row groups",
            self.rows_written, self.row_groups_written
        )
    }
}
