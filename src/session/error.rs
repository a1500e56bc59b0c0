use crate::catalog::CatalogError;
use crate::waveform::WaveformError;
use crate::writer::WriterError;

/// Coarse classification of session failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Bundle retrieval failed or returned incomplete data
    Fetch,
    /// Paired sources or waveform grids disagree
    Consistency,
    /// A unit has no usable waveform channel
    ChannelSelection,
    /// Tables could not be written
    Output,
}

/// Errors that abort processing of one session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Catalog could not deliver the bundle
    #[error("Fetch error: {0}")]
    FetchError(#[from] CatalogError),

    /// Bundle lacks data the tables require
    #[error("Incomplete bundle: {0}")]
    IncompleteBundle(String),

    /// Pupil and gaze samples are not on the same time index
    #[error("Eye tracking index mismatch: pupil has {pupil} samples, gaze has {gaze}, first difference at row {position}")]
    EyeTrackingIndexMismatch {
        /// Pupil sample count
        pupil: usize,
        /// Gaze sample count
        gaze: usize,
        /// First row where the timestamps differ
        position: usize,
    },

    /// A behavioral table is internally inconsistent
    #[error("Inconsistent {table} table: {reason}")]
    InconsistentBehavior {
        /// Table name
        table: String,
        /// What is wrong
        reason: String,
    },

    /// Channel selection or time grid reconciliation failed
    #[error("Waveform error: {0}")]
    WaveformError(#[from] WaveformError),

    /// A table could not be written
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),

    /// I/O error preparing the output directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SessionError {
    /// Classify the failure
    pub fn kind(&self) -> FaultKind {
        match self {
            SessionError::FetchError(_) | SessionError::IncompleteBundle(_) => FaultKind::Fetch,
            SessionError::EyeTrackingIndexMismatch { .. }
            | SessionError::InconsistentBehavior { .. } => FaultKind::Consistency,
            SessionError::WaveformError(
                WaveformError::NoChannels { .. } | WaveformError::EmptyChannel { .. },
            ) => FaultKind::ChannelSelection,
            SessionError::WaveformError(_) => FaultKind::Consistency,
            SessionError::WriterError(_) | SessionError::IoError(_) => FaultKind::Output,
        }
    }
}
