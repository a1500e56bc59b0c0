use std::collections::BTreeMap;
use std::fs;
use std::fs::File;

use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use tempfile::tempdir;

use super::*;
use crate::catalog::{MemoryCatalog, SessionBundle};
use crate::model::{BehaviorTable, RawUnit, StimulusEvent};
use crate::reader::{read_stimulus_rows, read_unit_spike_trains, ReaderConfig};
use crate::schema::{EYETRACKING_TABLE, RUNNING_TABLE, STIMULI_TABLE, UNITS_TABLE};
use crate::value::Value;
use crate::waveform::{UnitWaveforms, WaveformChannelSample};

fn axis(offset: f64) -> Vec<Option<f64>> {
    (0..4).map(|i| Some(offset + i as f64 * 0.000_033_3)).collect()
}

fn unit(unit_id: i64, area: &str) -> RawUnit {
    let mut attributes = BTreeMap::new();
    attributes.insert(
        "ecephys_structure_acronym".to_string(),
        Value::from(area),
    );
    attributes.insert("snr".to_string(), Value::Float64(2.5));
    RawUnit {
        unit_id,
        attributes,
    }
}

fn stimulus(id: i64, name: &str, color: Value) -> StimulusEvent {
    let mut attributes = BTreeMap::new();
    attributes.insert("color".to_string(), color);
    attributes.insert("spatial_frequency".to_string(), Value::from("[0.04]"));
    StimulusEvent {
        presentation_id: id,
        start_time: 10.0 + id as f64,
        stop_time: Some(10.25 + id as f64),
        stimulus_name: Value::from(name),
        attributes,
    }
}

fn timed(times: &[f64], column: &str) -> BehaviorTable {
    BehaviorTable {
        timestamps: times.to_vec(),
        columns: vec![],
    }
    .with_column(column, times.iter().map(|t| Some(t + 1.0)).collect())
}

/// Two units (3 and 0 spikes), two channels each, pupil and gaze on one index.
fn sample_bundle(session_id: i64) -> SessionBundle {
    let mut bundle = SessionBundle::new(session_id);
    bundle.units = vec![unit(11, "VISp"), unit(12, "VISl")];
    bundle.spike_times.insert(11, vec![0.5, 1.5, 2.5]);
    bundle.spike_times.insert(12, vec![]);
    bundle.mean_waveforms.insert(
        11,
        UnitWaveforms {
            time: axis(0.0),
            channels: vec![
                WaveformChannelSample::new(100, vec![0.0, 1.0, -1.0, 0.0]),
                WaveformChannelSample::new(101, vec![0.0, 5.0, -5.0, 0.0]),
            ],
        },
    );
    bundle.mean_waveforms.insert(
        12,
        UnitWaveforms {
            time: axis(0.0),
            channels: vec![
                WaveformChannelSample::new(100, vec![0.0, 3.0, -3.0, 0.0]),
                WaveformChannelSample::new(101, vec![0.0, 2.0, -2.0, 0.0]),
            ],
        },
    );
    bundle.running_speed = timed(&[0.0, 0.5, 1.0], "velocity");
    bundle.pupil = Some(timed(&[0.0, 0.033], "pupil_width"));
    bundle.gaze = Some(timed(&[0.0, 0.033], "raw_screen_coordinates_x_cm"));
    bundle.stimuli = vec![
        stimulus(0, "flashes", Value::from("null")),
        stimulus(1, "flashes", Value::Int64(1)),
        stimulus(2, "flashes", Value::Int64(0)),
    ];
    bundle
}

fn default_fields() -> Vec<String> {
    DEFAULT_COERCE_FIELDS.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_tables_from_bundle() {
    let tables =
        SessionTables::from_bundle(sample_bundle(7), &default_fields(), Default::default())
            .unwrap();

    assert_eq!(tables.units.len(), 2);
    assert_eq!(tables.units[0].spike_times.len(), 3);
    assert!(tables.units[1].spike_times.is_empty());

    assert_eq!(tables.units[0].mean_waveform_channel, Some(101));
    assert_eq!(tables.units[0].mean_waveform, vec![0.0, 5.0, -5.0, 0.0]);
    assert_eq!(tables.units[1].mean_waveform_channel, Some(100));

    let grid = &tables.units[0].mean_waveforms_times;
    assert_eq!(grid.len(), 4);
    assert!(grid.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(grid, &tables.units[1].mean_waveforms_times);
    assert_eq!(grid[1], 0.000_033);

    assert_eq!(tables.nulls_replaced, 1);
    assert_eq!(
        tables.stimuli[0].attributes["spatial_frequency"],
        Value::Float64(0.04)
    );
    assert_eq!(tables.eyetracking.as_ref().map(|e| e.columns.len()), Some(2));
}

#[test]
fn test_grid_repair_uses_first_axis() {
    let mut bundle = sample_bundle(7);
    if let Some(w) = bundle.mean_waveforms.get_mut(&12) {
        w.time[2] = None;
    }
    let tables =
        SessionTables::from_bundle(bundle, &default_fields(), Default::default()).unwrap();
    assert_eq!(tables.grid.repaired_units, vec![12]);
    assert_eq!(
        tables.units[0].mean_waveforms_times,
        tables.units[1].mean_waveforms_times
    );
}

#[test]
fn test_zero_channels_is_channel_selection_fault() {
    let mut bundle = sample_bundle(7);
    if let Some(w) = bundle.mean_waveforms.get_mut(&12) {
        w.channels.clear();
    }
    let err = SessionTables::from_bundle(bundle, &default_fields(), Default::default())
        .unwrap_err();
    assert_eq!(err.kind(), FaultKind::ChannelSelection);

    let mut bundle = sample_bundle(7);
    bundle.mean_waveforms.remove(&11);
    let err = SessionTables::from_bundle(bundle, &default_fields(), Default::default())
        .unwrap_err();
    assert_eq!(err.kind(), FaultKind::ChannelSelection);
}

#[test]
fn test_missing_spike_train_is_fetch_fault() {
    let mut bundle = sample_bundle(7);
    bundle.spike_times.remove(&12);
    let err = SessionTables::from_bundle(bundle, &default_fields(), Default::default())
        .unwrap_err();
    assert!(matches!(err, SessionError::IncompleteBundle(_)));
    assert_eq!(err.kind(), FaultKind::Fetch);
}

#[test]
fn test_transform_writes_all_tables() {
    let dir = tempdir().unwrap();
    let catalog = MemoryCatalog::new().with_bundle(sample_bundle(7));
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(dir.path()));

    let outcome = transformer.transform(7).unwrap();
    let SessionOutcome::Written(stats) = outcome else {
        panic!("expected a written session");
    };
    assert_eq!(stats.units, 2);
    assert_eq!(stats.spikes, 3);
    assert_eq!(stats.stimuli, 3);
    assert_eq!(stats.running_rows, 3);
    assert_eq!(stats.eyetracking_rows, Some(2));
    assert!(!stats.cache_cleared);

    let ses = dir.path().join("ses-7");
    for table in [UNITS_TABLE, RUNNING_TABLE, STIMULI_TABLE, EYETRACKING_TABLE] {
        assert!(ses.join(table).exists(), "{} missing", table);
    }

    let config = ReaderConfig::default();
    let units = read_unit_spike_trains(ses.join(UNITS_TABLE), &config).unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].area.as_deref(), Some("VISp"));
    assert_eq!(units[0].spike_times, vec![0.5, 1.5, 2.5]);

    let stimuli = read_stimulus_rows(ses.join(STIMULI_TABLE), &config).unwrap();
    let missing = stimuli.iter().filter(|s| s.color.is_missing()).count();
    assert_eq!(missing, 1);
    assert_eq!(stimuli[1].color.as_f64(), Some(1.0));
    assert_eq!(stimuli[2].color.as_f64(), Some(0.0));
}

#[test]
fn test_zero_unit_session_keeps_units_schema() {
    let mut bundle = sample_bundle(9);
    bundle.units.clear();
    bundle.spike_times.clear();
    bundle.mean_waveforms.clear();

    let tables =
        SessionTables::from_bundle(bundle.clone(), &default_fields(), Default::default())
            .unwrap();
    assert!(tables.units.is_empty());
    assert!(tables.grid.is_empty());
    assert!(tables.grid.repaired_units.is_empty());

    let dir = tempdir().unwrap();
    let catalog = MemoryCatalog::new().with_bundle(bundle);
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(dir.path()));
    let SessionOutcome::Written(stats) = transformer.transform(9).unwrap() else {
        panic!("expected a written session");
    };
    assert_eq!(stats.units, 0);
    assert_eq!(stats.spikes, 0);
    assert_eq!(stats.stimuli, 3);

    let path = dir.path().join("ses-9").join(UNITS_TABLE);
    let file = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(file.metadata().file_metadata().num_rows(), 0);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    let schema = builder.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec![
            "unit_id",
            "spike_times",
            "mean_waveform",
            "mean_waveform_channel",
            "mean_waveforms_times"
        ]
    );
    for list in ["spike_times", "mean_waveform", "mean_waveforms_times"] {
        let field = schema.field_with_name(list).unwrap();
        assert!(matches!(field.data_type(), DataType::List(item) if item.data_type() == &DataType::Float64));
    }

    let units = read_unit_spike_trains(&path, &ReaderConfig::default()).unwrap();
    assert!(units.is_empty());

    let out = tempdir().unwrap();
    let joined = crate::joiner::SpikeJoiner::default()
        .join_session(dir.path(), 9, out.path())
        .unwrap();
    assert_eq!(joined.spikes, 0);
}

#[test]
fn test_rerun_skips_without_fetching() {
    let dir = tempdir().unwrap();
    let catalog = MemoryCatalog::new().with_bundle(sample_bundle(7));
    let mut config = TransformConfig::new(dir.path());
    config.clear_cache = true;
    let transformer = SessionTransformer::new(&catalog, config);

    match transformer.transform(7).unwrap() {
        SessionOutcome::Written(stats) => assert!(stats.cache_cleared),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(catalog.fetch_count(), 1);
    assert!(!catalog.is_cached(7));

    let units_path = dir.path().join("ses-7").join(UNITS_TABLE);
    let before = fs::read(&units_path).unwrap();

    assert_eq!(transformer.transform(7).unwrap(), SessionOutcome::Skipped(7));
    assert_eq!(catalog.fetch_count(), 1);
    assert_eq!(fs::read(&units_path).unwrap(), before);
}

#[test]
fn test_overwrite_refetches() {
    let dir = tempdir().unwrap();
    let catalog = MemoryCatalog::new().with_bundle(sample_bundle(7));
    let mut config = TransformConfig::new(dir.path());
    config.overwrite = true;
    let transformer = SessionTransformer::new(&catalog, config);

    transformer.transform(7).unwrap();
    assert!(matches!(
        transformer.transform(7).unwrap(),
        SessionOutcome::Written(_)
    ));
    assert_eq!(catalog.fetch_count(), 2);
}

#[test]
fn test_eyetracking_mismatch_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut bundle = sample_bundle(7);
    bundle.gaze = Some(timed(&[0.0, 0.034], "raw_screen_coordinates_x_cm"));
    let catalog = MemoryCatalog::new().with_bundle(bundle);
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(dir.path()));

    let err = transformer.transform(7).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Consistency);
    assert!(!dir.path().join("ses-7").join(UNITS_TABLE).exists());
}

#[test]
fn test_no_pupil_means_no_eyetracking_table() {
    let dir = tempdir().unwrap();
    let mut bundle = sample_bundle(7);
    bundle.pupil = None;
    let catalog = MemoryCatalog::new().with_bundle(bundle);
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(dir.path()));

    match transformer.transform(7).unwrap() {
        SessionOutcome::Written(stats) => assert_eq!(stats.eyetracking_rows, None),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!dir.path().join("ses-7").join(EYETRACKING_TABLE).exists());
}

#[test]
fn test_batch_continues_after_failure() {
    let dir = tempdir().unwrap();
    let catalog = MemoryCatalog::new()
        .with_bundle(sample_bundle(7))
        .with_bundle(sample_bundle(9));
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(dir.path()));

    let report = transformer.run_batch([7, 8, 9]).unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 8);
    assert_eq!(report.failed[0].1.kind(), FaultKind::Fetch);
    assert!(!report.is_success());
    assert_eq!(report.to_string(), "3 sessions: 2 written, 0 skipped, 1 failed");
}
