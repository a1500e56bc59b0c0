/// Errors raised while selecting channels or reconciling time axes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveformError {
    /// A unit has no per-channel waveform samples
    #[error("unit {unit_id} has no waveform channels")]
    NoChannels {
        /// Unit identifier
        unit_id: i64,
    },

    /// A channel carries an empty amplitude trace
    #[error("unit {unit_id}, channel {channel_id}: empty amplitude trace")]
    EmptyChannel {
        /// Unit identifier
        unit_id: i64,
        /// Channel identifier
        channel_id: i64,
    },

    /// A unit's time axis length differs from the first unit's
    #[error("unit {unit_id}: time axis has {found} points, expected {expected}")]
    GridLengthMismatch {
        /// Unit identifier
        unit_id: i64,
        /// Length of the reference grid
        expected: usize,
        /// Length of this unit's axis
        found: usize,
    },

    /// Rounded time axes disagree across units
    #[error("unit {unit_id}: rounded time axis differs from the shared grid at position {position}")]
    GridMismatch {
        /// Unit identifier
        unit_id: i64,
        /// First differing grid position
        position: usize,
    },

    /// A rounded time axis is not strictly increasing
    #[error("unit {unit_id}: rounded time axis is not strictly increasing at position {position}")]
    NonMonotonic {
        /// Unit identifier
        unit_id: i64,
        /// Position of the offending sample
        position: usize,
    },
}
