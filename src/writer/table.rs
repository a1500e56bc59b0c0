use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

use crate::schema::{
    FORMAT_VERSION, KEY_CREATED, KEY_FORMAT_VERSION, KEY_INDEX_COLUMN, KEY_PRODUCER,
    KEY_SESSION_ID, KEY_TABLE,
};

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;

/// Footer metadata attached to every emitted table
#[derive(Debug, Clone)]
pub struct TableMetadata {
    /// Table kind, e.g. `units`
    pub table: String,
    /// Logical index column
    pub index_column: Option<String>,
    /// Session the table was derived from
    pub session_id: Option<i64>,
}

impl TableMetadata {
    /// Metadata for a table kind
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            index_column: None,
            session_id: None,
        }
    }

    /// Name the logical index column
    pub fn index_column(mut self, column: &str) -> Self {
        self.index_column = Some(column.to_string());
        self
    }

    /// Tag with the source session
    pub fn session(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Convert to a map suitable for Parquet key_value_metadata
    pub fn to_parquet_metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
        metadata.insert(KEY_CREATED.to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert(
            KEY_PRODUCER.to_string(),
            format!("ecephys-tables v{}", env!("CARGO_PKG_VERSION")),
        );
        metadata.insert(KEY_TABLE.to_string(), self.table.clone());
        if let Some(ref column) = self.index_column {
            metadata.insert(KEY_INDEX_COLUMN.to_string(), column.clone());
        }
        if let Some(session_id) = self.session_id {
            metadata.insert(KEY_SESSION_ID.to_string(), session_id.to_string());
        }
        metadata
    }
}

/// Writes whole record batches as single Parquet files
#[derive(Debug, Clone, Default)]
pub struct TableWriter {
    config: WriterConfig,
}

impl TableWriter {
    /// Create a writer with the given configuration
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write a batch to any Write implementation
    pub fn write_to<W: Write + Send>(
        &self,
        sink: W,
        batch: &RecordBatch,
        metadata: &TableMetadata,
    ) -> Result<WriterStats, WriterError> {
        let props = self
            .config
            .to_writer_properties(&metadata.to_parquet_metadata());
        let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(props))?;
        writer.write(batch)?;
        let file_metadata = writer.close()?;

        Ok(WriterStats {
            rows_written: batch.num_rows(),
            row_groups_written: file_metadata.row_groups.len(),
            file_size_bytes: file_metadata
                .row_groups
                .iter()
                .map(|rg| rg.total_byte_size as u64)
                .sum(),
        })
    }

    /// Write a batch to `path`.
    ///
    /// The file is written next to its destination under a temporary name and
    /// renamed into place, so a partially written table is never visible.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        path: P,
        batch: &RecordBatch,
        metadata: &TableMetadata,
    ) -> Result<WriterStats, WriterError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp_file = NamedTempFile::new_in(dir)?;
        let stats = self.write_to(temp_file.as_file().try_clone()?, batch, metadata)?;
        temp_file
            .persist(path)
            .map_err(|e| WriterError::IoError(e.error))?;

        debug!("{}: {}", path.display(), stats);
        Ok(stats)
    }
}
