//! # ecephys-tables - Per-Session Tables from Extracellular Electrophysiology Recordings
//!
//! `ecephys_tables` turns multi-modal recording sessions (spike trains, mean
//! waveforms, running speed, eye tracking, stimulus presentations) into compact,
//! analysis-ready Parquet tables, one directory per session.
//!
//! ## Pipeline
//!
//! ```text
//! CatalogProvider ──► SessionTransformer ──► <data_root>/ses-<id>/*.parquet ──► SpikeJoiner ──► <out>/ses-<id>/*.parquet
//!                       │
//!                       ├─ coerce: string-encoded stimulus conditions
//!                       └─ waveform: channel selection, shared time grid
//! ```
//!
//! 1. [`metadata::export_dataset_metadata`] writes the dataset indices
//!    (`all_sessions.csv`, `all_channels.csv`, `all_units.csv`) and one
//!    `session.json` descriptor per session.
//! 2. [`session::SessionTransformer`] fetches each session bundle and writes
//!    `units`, `running`, `stimuli` and (when pupil data exists) `eyetracking`
//!    tables. Sessions that already have a units table are skipped.
//! 3. [`joiner::SpikeJoiner`] expands spike trains into one row per spike,
//!    labels visual areas, and keeps only flash and natural-scene onsets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecephys_tables::catalog::CacheDirCatalog;
//! use ecephys_tables::session::{SessionTransformer, TransformConfig};
//!
//! let catalog = CacheDirCatalog::new("cache");
//! let transformer = SessionTransformer::new(&catalog, TransformConfig::new("data/raw"));
//! let report = transformer.run_batch([715093703, 719161530])?;
//! println!("{}", report);
//! # Ok::<(), ecephys_tables::session::SessionError>(())
//! ```
//!
//! ## Units Table
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | unit_id | Int64 | Unit identifier (index) |
//! | *attributes* | inferred | Structure acronym, quality metrics, ... |
//! | spike_times | List<Float64> | Spike times in seconds |
//! | mean_waveform | List<Float64> | Trace of the largest-amplitude channel |
//! | mean_waveform_channel | Int64 | Channel of that trace |
//! | mean_waveforms_times | List<Float64> | Shared time grid, 6 decimals |
//!
//! ### File Footer Metadata
//!
//! - `ecephys:format_version`: Format version string
//! - `ecephys:created`: RFC 3339 creation time
//! - `ecephys:producer`: Producing software and version
//! - `ecephys:table`: Table kind
//! - `ecephys:index_column`: Logical index column
//! - `ecephys:session_id`: Source session

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod coerce;
pub mod joiner;
pub mod metadata;
pub mod model;
pub mod reader;
pub mod schema;
pub mod session;
pub mod value;
pub mod waveform;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{
        CacheDirCatalog, CatalogError, CatalogProvider, MemoryCatalog, SessionBundle,
    };
    pub use crate::coerce::{coerce_literal, Coerced, ListNarrowing};
    pub use crate::joiner::{JoinConfig, JoinError, JoinReport, JoinStats, SpikeJoiner};
    pub use crate::metadata::{export_dataset_metadata, MetadataError, MetadataStats};
    pub use crate::model::{
        BehaviorTable, IndexRecord, RawUnit, SessionDescriptor, SpikeEvent, StimulusEvent,
        StimulusMarker, UnitRecord,
    };
    pub use crate::reader::{ReaderConfig, ReaderError};
    pub use crate::session::{
        BatchReport, FaultKind, SessionError, SessionOutcome, SessionStats, SessionTransformer,
        TransformConfig,
    };
    pub use crate::value::Value;
    pub use crate::waveform::{reconcile_time_axes, select_channel, SharedTimeGrid, WaveformError};
    pub use crate::writer::{CompressionType, TableWriter, WriterConfig, WriterError, WriterStats};
}
