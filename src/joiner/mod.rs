//! # Area-Filtered Spike Joiner
//!
//! Reads the `units` and `stimuli` tables a session transformer emitted and
//! writes two analysis-ready tables per session under a separate output root:
//!
//! - `units.parquet`: one row per spike (`time`, `unit`, `area`), areas relabelled
//!   through [`AREA_MAPPING`]
//! - `stimuli.parquet`: onsets (`time`, `kind`) of the whitelisted stimulus kinds
//!   whose color condition matches
//!
//! Both tables are logically indexed by `time`; the index is not unique.

mod areas;
mod error;
mod expand;
mod filter;


pub use areas::{canonical_area, AREA_MAPPING};
pub use error::JoinError;
pub use expand::expand_spike_trains;
pub use filter::{
    color_matches, filter_stimuli, JoinConfig, DEFAULT_REFERENCE_COLOR, DEFAULT_STIMULUS_KINDS,
};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::reader::{read_stimulus_rows, read_unit_spike_trains, ReaderConfig};
use crate::schema::{columns, parse_session_dir_name, session_dir_name, STIMULI_TABLE, UNITS_TABLE};
use crate::writer::{spike_events_batch, stimulus_markers_batch, TableMetadata, TableWriter};

/// Row counts for one joined session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStats {
    /// Session identifier
    pub session_id: i64,
    /// Spike rows written
    pub spikes: usize,
    /// Stimulus rows written
    pub stimuli: usize,
}

impl fmt::Display for JoinStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session {}: {} spikes, {} stimulus onsets",
            self.session_id, self.spikes, self.stimuli
        )
    }
}

/// Result of joining every session under a data root
#[derive(Debug, Default)]
pub struct JoinReport {
    /// Sessions that were joined
    pub joined: Vec<JoinStats>,
    /// Sessions that failed, with the reason
    pub failed: Vec<(i64, JoinError)>,
}

impl JoinReport {
    /// Record one session's result
    pub fn record(&mut self, session_id: i64, result: Result<JoinStats, JoinError>) {
        match result {
            Ok(stats) => self.joined.push(stats),
            Err(e) => self.failed.push((session_id, e)),
        }
    }

    /// Number of sessions attempted
    pub fn total(&self) -> usize {
        self.joined.len() + self.failed.len()
    }

    /// True when no session failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for JoinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sessions: {} joined, {} failed",
            self.total(),
            self.joined.len(),
            self.failed.len()
        )
    }
}

/// Session ids of the `ses-<id>` directories under `data_root` that hold a
/// units table, ascending.
///
/// Directories with only a session descriptor are not listed.
pub fn list_sessions<P: AsRef<Path>>(data_root: P) -> Result<Vec<i64>, JoinError> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(data_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str().and_then(parse_session_dir_name) else {
            continue;
        };
        if entry.path().join(UNITS_TABLE).is_file() {
            ids.push(id);
        } else {
            debug!("Session {}: no {}, not listed", id, UNITS_TABLE);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// Joins spike trains with area labels and filters stimuli, per session
#[derive(Debug, Clone, Default)]
pub struct SpikeJoiner {
    config: JoinConfig,
    reader: ReaderConfig,
    writer: TableWriter,
}

impl SpikeJoiner {
    /// Create a joiner
    pub fn new(config: JoinConfig, writer: TableWriter) -> Self {
        Self {
            config,
            reader: ReaderConfig::default(),
            writer,
        }
    }

    /// Joiner settings
    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Join one session from `data_root` into `out_root`.
    pub fn join_session(
        &self,
        data_root: &Path,
        session_id: i64,
        out_root: &Path,
    ) -> Result<JoinStats, JoinError> {
        let input = data_root.join(session_dir_name(session_id));
        if !input.is_dir() {
            return Err(JoinError::SessionNotFound(session_id));
        }
        let units_path = require(input.join(UNITS_TABLE))?;
        let stimuli_path = require(input.join(STIMULI_TABLE))?;

        info!("Joining session {}", session_id);
        let markers = filter_stimuli(
            &read_stimulus_rows(&stimuli_path, &self.reader)?,
            &self.config,
        );
        let spikes = expand_spike_trains(
            &read_unit_spike_trains(&units_path, &self.reader)?,
            self.config.only_mapped_areas,
        );

        let output = out_root.join(session_dir_name(session_id));
        fs::create_dir_all(&output)?;
        let meta = |table: &str| {
            TableMetadata::new(table)
                .index_column(columns::TIME)
                .session(session_id)
        };
        self.writer.write_file(
            output.join(UNITS_TABLE),
            &spike_events_batch(&spikes)?,
            &meta("spike_events"),
        )?;
        self.writer.write_file(
            output.join(STIMULI_TABLE),
            &stimulus_markers_batch(&markers)?,
            &meta("stimulus_markers"),
        )?;

        let stats = JoinStats {
            session_id,
            spikes: spikes.len(),
            stimuli: markers.len(),
        };
        info!("{}", stats);
        Ok(stats)
    }

    /// Join every session listed under `data_root`, in ascending id order.
    ///
    /// A failing session is recorded in the report and the rest still run;
    /// only an unreadable `data_root` is an error.
    pub fn join_all(&self, data_root: &Path, out_root: &Path) -> Result<JoinReport, JoinError> {
        let mut report = JoinReport::default();
        for session_id in list_sessions(data_root)? {
            let result = self.join_session(data_root, session_id, out_root);
            if let Err(ref e) = result {
                error!("Session {} failed: {}", session_id, e);
            }
            report.record(session_id, result);
        }
        info!("{}", report);
        Ok(report)
    }
}

fn require(path: PathBuf) -> Result<PathBuf, JoinError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(JoinError::MissingTable(path))
    }
}
