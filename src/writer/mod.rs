//! # Table Writer Module
//!
//! Writes the pipeline's tables as Parquet files.
//!
//! ## Design Principles
//!
//! 1. **One batch per table**: a session's tables fit in memory, so each table is
//!    assembled as a single Arrow record batch and written in one pass.
//!
//! 2. **Atomic emission**: files are written under a temporary name and renamed
//!    into place. A table that exists on disk is always complete, which is what
//!    the transformer's skip check relies on.
//!
//! 3. **Self-describing files**: format version, producer, table kind, index
//!    column and source session go into the Parquet footer's key_value_metadata.
//!
//! 4. **Configurable Compression**: Supports ZSTD (default), Snappy, and uncompressed.

mod batches;
mod columns;
mod config;
mod error;
mod stats;
mod table;


pub use batches::{
    behavior_batch, spike_events_batch, stimuli_batch, stimulus_markers_batch, units_batch,
};
pub use columns::{attribute_names, infer_column_kind, ColumnKind};
pub use config::{CompressionType, WriterConfig};
pub use error::WriterError;
pub use stats::WriterStats;
pub use table::{TableMetadata, TableWriter};
