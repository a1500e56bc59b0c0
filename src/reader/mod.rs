//! # Table Reader Module
//!
//! Reads session tables back from disk for the downstream join stage.
//!
//! Only the columns the joiner needs are decoded; everything else in the file is
//! left alone, so extra attribute columns never break reading.

mod error;
mod tables;
mod utils;

pub use error::ReaderError;
pub use tables::{
    read_batches, read_stimulus_rows, read_unit_spike_trains, StimulusRow, UnitSpikeTrain,
};

/// Configuration for reading tables
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Batch size for reading records
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 65536 }
    }
}
