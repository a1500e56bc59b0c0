//! # Dataset Metadata
//!
//! Dataset-level bookkeeping that precedes per-session processing:
//!
//! ```text
//! data_root/
//! ├── all_sessions.csv
//! ├── all_channels.csv
//! ├── all_units.csv
//! └── ses-<id>/session.json
//! ```
//!
//! The session batch later reads its work list back from `all_sessions.csv`.

mod dataset;
mod descriptor;
mod error;


use std::fs;
use std::path::Path;

use log::info;

use crate::catalog::CatalogProvider;
use crate::schema::session_dir_name;

pub use dataset::{
    read_index_ids, read_index_ids_file, write_index_csv, write_index_csv_file, IndexRow,
    ID_COLUMN,
};
pub use descriptor::{read_session_descriptor, write_session_descriptor};
pub use error::MetadataError;

/// Session index file name
pub const ALL_SESSIONS_CSV: &str = "all_sessions.csv";
/// Channel index file name
pub const ALL_CHANNELS_CSV: &str = "all_channels.csv";
/// Unit index file name
pub const ALL_UNITS_CSV: &str = "all_units.csv";

/// Counts from a metadata export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataStats {
    /// Sessions in the index (one descriptor each)
    pub sessions: usize,
    /// Channels in the index
    pub channels: usize,
    /// Units in the index
    pub units: usize,
}

/// Fetch the dataset-wide indices and write them under `data_root`.
pub fn export_dataset_metadata<C, P>(catalog: &C, data_root: P) -> Result<MetadataStats, MetadataError>
where
    C: CatalogProvider + ?Sized,
    P: AsRef<Path>,
{
    let data_root = data_root.as_ref();
    fs::create_dir_all(data_root)?;

    let sessions = catalog.session_index()?;
    let channels = catalog.channel_index()?;
    let units = catalog.unit_index()?;

    write_index_csv_file(data_root.join(ALL_SESSIONS_CSV), &sessions)?;
    write_index_csv_file(data_root.join(ALL_CHANNELS_CSV), &channels)?;
    write_index_csv_file(data_root.join(ALL_UNITS_CSV), &units)?;

    for descriptor in &sessions {
        write_session_descriptor(data_root.join(session_dir_name(descriptor.session_id)), descriptor)?;
    }

    info!(
        "Exported {} sessions, {} channels, {} units to {}",
        sessions.len(),
        channels.len(),
        units.len(),
        data_root.display()
    );

    Ok(MetadataStats {
        sessions: sessions.len(),
        channels: channels.len(),
        units: units.len(),
    })
}
