use std::path::PathBuf;

use crate::reader::ReaderError;
use crate::writer::WriterError;

/// Errors that abort a join invocation
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// A session table the join needs does not exist
    #[error("Missing input table: {0}")]
    MissingTable(PathBuf),

    /// Requested session has no directory under the data root
    #[error("Session {0} not found under the data root")]
    SessionNotFound(i64),

    /// Input table could not be read
    #[error("Reader error: {0}")]
    ReaderError(#[from] ReaderError),

    /// Output table could not be written
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),

    /// I/O error listing or creating directories
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
