use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::catalog::{CatalogProvider, SessionBundle};
use crate::coerce::ListNarrowing;
use crate::model::{BehaviorTable, StimulusEvent, UnitRecord};
use crate::schema::{
    columns, session_dir_name, EYETRACKING_TABLE, RUNNING_TABLE, STIMULI_TABLE, UNITS_TABLE,
};
use crate::waveform::{reconcile_time_axes, select_channel, SharedTimeGrid, WaveformError};
use crate::writer::{
    behavior_batch, stimuli_batch, units_batch, TableMetadata, TableWriter, WriterConfig,
};

use super::behavior::{merge_eye_tracking, validate_behavior};
use super::stimuli::{coerce_condition_fields, normalize_null_sentinels, CoercionSummary};
use super::{BatchReport, SessionError, SessionOutcome, SessionStats};

/// Stimulus fields coerced by default
pub const DEFAULT_COERCE_FIELDS: [&str; 2] = [columns::SPATIAL_FREQUENCY, columns::PHASE];

/// Settings for the session transformer
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Root under which `ses-<id>/` directories are written
    pub data_root: PathBuf,
    /// Rewrite sessions whose units table already exists
    pub overwrite: bool,
    /// Drop the cached raw bundle after a successful write
    pub clear_cache: bool,
    /// Stimulus fields holding string-encoded literals
    pub coerce_fields: Vec<String>,
    /// What to do with list-valued literals
    pub list_narrowing: ListNarrowing,
    /// Parquet settings
    pub writer: WriterConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data/raw"),
            overwrite: false,
            clear_cache: false,
            coerce_fields: DEFAULT_COERCE_FIELDS.iter().map(|s| s.to_string()).collect(),
            list_narrowing: ListNarrowing::default(),
            writer: WriterConfig::default(),
        }
    }
}

impl TransformConfig {
    /// Default settings writing under `data_root`
    pub fn new<P: AsRef<Path>>(data_root: P) -> Self {
        Self {
            data_root: data_root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
}

/// The four tables derived from one bundle, ready to write
#[derive(Debug, Clone)]
pub struct SessionTables {
    /// Session identifier
    pub session_id: i64,
    /// Enriched units
    pub units: Vec<UnitRecord>,
    /// Running speed samples
    pub running: BehaviorTable,
    /// Cleaned stimulus presentations
    pub stimuli: Vec<StimulusEvent>,
    /// Pupil and gaze samples on one index
    pub eyetracking: Option<BehaviorTable>,
    /// Shared waveform time grid
    pub grid: SharedTimeGrid,
    /// Null sentinels replaced in the stimulus table
    pub nulls_replaced: usize,
    /// Condition field coercion counts
    pub coercion: CoercionSummary,
}

impl SessionTables {
    /// Derive all tables from a raw bundle.
    ///
    /// Pure: nothing is written and the bundle is consumed.
    pub fn from_bundle(
        mut bundle: SessionBundle,
        coerce_fields: &[String],
        narrowing: ListNarrowing,
    ) -> Result<Self, SessionError> {
        let session_id = bundle.session_id;

        validate_behavior(&bundle.running_speed, "running")?;
        let eyetracking = merge_eye_tracking(bundle.pupil.take(), bundle.gaze.take())?;

        let mut stimuli = std::mem::take(&mut bundle.stimuli);
        let nulls_replaced = normalize_null_sentinels(&mut stimuli);
        let coercion = coerce_condition_fields(&mut stimuli, coerce_fields, narrowing);

        let mut units = Vec::with_capacity(bundle.units.len());
        for raw in std::mem::take(&mut bundle.units) {
            let spikes = bundle.spike_times.remove(&raw.unit_id).ok_or_else(|| {
                SessionError::IncompleteBundle(format!("no spike times for unit {}", raw.unit_id))
            })?;
            let mut unit = UnitRecord::new(raw, spikes);

            let waveforms = bundle
                .mean_waveforms
                .get(&unit.unit_id)
                .ok_or(WaveformError::NoChannels {
                    unit_id: unit.unit_id,
                })?;
            let selection = select_channel(unit.unit_id, &waveforms.channels)?;
            debug!(
                "unit {}: channel {} (ptp {:.3})",
                unit.unit_id, selection.channel_id, selection.peak_to_peak
            );
            unit.mean_waveform = selection.amplitudes.to_vec();
            unit.mean_waveform_channel = Some(selection.channel_id);
            units.push(unit);
        }

        // every unit was checked for waveforms above
        let grid = reconcile_time_axes(units.iter().filter_map(|u| {
            bundle
                .mean_waveforms
                .get(&u.unit_id)
                .map(|w| (u.unit_id, w.time.as_slice()))
        }))?;
        if !grid.repaired_units.is_empty() {
            warn!(
                "session {}: {} unit(s) had missing waveform times and use the first unit's grid",
                session_id,
                grid.repaired_units.len()
            );
        }
        for unit in &mut units {
            unit.mean_waveforms_times = grid.times.clone();
        }

        Ok(Self {
            session_id,
            units,
            running: bundle.running_speed,
            stimuli,
            eyetracking,
            grid,
            nulls_replaced,
            coercion,
        })
    }
}

/// Turns raw session bundles into per-session Parquet tables
pub struct SessionTransformer<'a, C: CatalogProvider + ?Sized> {
    catalog: &'a C,
    config: TransformConfig,
    writer: TableWriter,
}

impl<'a, C: CatalogProvider + ?Sized> SessionTransformer<'a, C> {
    /// Create a transformer over a catalog
    pub fn new(catalog: &'a C, config: TransformConfig) -> Self {
        let writer = TableWriter::new(config.writer.clone());
        Self {
            catalog,
            config,
            writer,
        }
    }

    /// Transformer settings
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Output directory of a session
    pub fn session_dir(&self, session_id: i64) -> PathBuf {
        self.config.data_root.join(session_dir_name(session_id))
    }

    /// True if the session's units table exists.
    ///
    /// The units table is written last, so its presence means the session is complete.
    pub fn is_complete(&self, session_id: i64) -> bool {
        self.session_dir(session_id).join(UNITS_TABLE).exists()
    }

    /// Process one session: fetch, derive, write, then optionally clear the cache.
    pub fn transform(&self, session_id: i64) -> Result<SessionOutcome, SessionError> {
        if !self.config.overwrite && self.is_complete(session_id) {
            warn!(
                "Skipping session {}: output exists (use --overwrite to rebuild)",
                session_id
            );
            return Ok(SessionOutcome::Skipped(session_id));
        }

        info!("Loading session {}", session_id);
        let mut bundle = self.catalog.session_bundle(session_id)?;
        if bundle.session_id != session_id {
            debug!(
                "bundle carries session id {}, using requested {}",
                bundle.session_id, session_id
            );
            bundle.session_id = session_id;
        }

        let tables = SessionTables::from_bundle(
            bundle,
            &self.config.coerce_fields,
            self.config.list_narrowing,
        )?;
        let mut stats = self.write_tables(&tables)?;

        if self.config.clear_cache {
            stats.cache_cleared = self.clear_cache(session_id);
        }

        info!("Wrote {}", stats);
        Ok(SessionOutcome::Written(stats))
    }

    /// Process sessions in order, continuing past failures.
    ///
    /// Only an unusable output root aborts the batch.
    pub fn run_batch<I>(&self, session_ids: I) -> Result<BatchReport, SessionError>
    where
        I: IntoIterator<Item = i64>,
    {
        fs::create_dir_all(&self.config.data_root)?;

        let mut report = BatchReport::default();
        for session_id in session_ids {
            let result = self.transform(session_id);
            if let Err(ref e) = result {
                error!("Session {} failed ({:?}): {}", session_id, e.kind(), e);
            }
            report.record(session_id, result);
        }
        info!("{}", report);
        Ok(report)
    }

    fn write_tables(&self, tables: &SessionTables) -> Result<SessionStats, SessionError> {
        let dir = self.session_dir(tables.session_id);
        fs::create_dir_all(&dir)?;
        let meta = |table: &str, index: &str| {
            TableMetadata::new(table)
                .index_column(index)
                .session(tables.session_id)
        };

        self.writer.write_file(
            dir.join(RUNNING_TABLE),
            &behavior_batch(&tables.running, columns::START_TIME)?,
            &meta("running", columns::START_TIME),
        )?;
        self.writer.write_file(
            dir.join(STIMULI_TABLE),
            &stimuli_batch(&tables.stimuli)?,
            &meta("stimuli", columns::STIMULUS_PRESENTATION_ID),
        )?;

        let eye_path = dir.join(EYETRACKING_TABLE);
        let eyetracking_rows = match &tables.eyetracking {
            Some(eye) => {
                self.writer.write_file(
                    &eye_path,
                    &behavior_batch(eye, columns::TIME)?,
                    &meta("eyetracking", columns::TIME),
                )?;
                Some(eye.len())
            }
            None => {
                // stale table from an earlier run with pupil data
                if eye_path.exists() {
                    fs::remove_file(&eye_path)?;
                }
                info!("session {}: no eye tracking recorded", tables.session_id);
                None
            }
        };

        // last, so its presence marks a complete session
        self.writer.write_file(
            dir.join(UNITS_TABLE),
            &units_batch(&tables.units)?,
            &meta("units", columns::UNIT_ID),
        )?;

        Ok(SessionStats {
            session_id: tables.session_id,
            units: tables.units.len(),
            spikes: tables.units.iter().map(|u| u.spike_times.len()).sum(),
            stimuli: tables.stimuli.len(),
            running_rows: tables.running.len(),
            eyetracking_rows,
            repaired_units: tables.grid.repaired_units.len(),
            nulls_replaced: tables.nulls_replaced,
            cache_cleared: false,
        })
    }

    fn clear_cache(&self, session_id: i64) -> bool {
        match self.catalog.clear_session_cache(session_id) {
            Ok(true) => {
                debug!("session {}: cache cleared", session_id);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("session {}: could not clear cache: {}", session_id, e);
                false
            }
        }
    }
}
