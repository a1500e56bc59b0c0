//! End-to-end test of the session pipeline
//!
//! A synthetic session goes through the on-disk catalog, the metadata export,
//! the session transformer and the spike joiner; every output is read back
//! with the Parquet reader.

use std::collections::BTreeMap;
use std::fs::{self, File};

use arrow::array::{Array, Float64Array, Int64Array, ListArray, StringArray};
use parquet::file::reader::{FileReader, SerializedFileReader};
use tempfile::tempdir;

use ecephys_tables::catalog::{CacheDirCatalog, CatalogProvider, SessionBundle};
use ecephys_tables::joiner::SpikeJoiner;
use ecephys_tables::metadata::{
    export_dataset_metadata, read_index_ids_file, read_session_descriptor, ALL_SESSIONS_CSV,
};
use ecephys_tables::model::{BehaviorTable, RawUnit, SessionDescriptor, StimulusEvent};
use ecephys_tables::reader::{read_batches, ReaderConfig};
use ecephys_tables::schema::{
    columns, KEY_INDEX_COLUMN, KEY_SESSION_ID, SESSION_DESCRIPTOR, STIMULI_TABLE, UNITS_TABLE,
};
use ecephys_tables::session::{SessionOutcome, SessionTransformer, TransformConfig};
use ecephys_tables::value::Value;
use ecephys_tables::waveform::{UnitWaveforms, WaveformChannelSample};

const SESSION_ID: i64 = 715093703;

fn synthetic_bundle() -> SessionBundle {
    let mut bundle = SessionBundle::new(SESSION_ID);

    for (unit_id, area) in [(950907205, "VISp"), (950907216, "VISam")] {
        let mut attributes = BTreeMap::new();
        attributes.insert(columns::STRUCTURE_ACRONYM.to_string(), Value::from(area));
        attributes.insert("probe_id".to_string(), Value::Int64(810755797));
        bundle.units.push(RawUnit {
            unit_id,
            attributes,
        });
    }
    bundle.spike_times.insert(950907205, vec![3.1, 3.2, 7.5]);
    bundle.spike_times.insert(950907216, vec![]);

    // sampled at 30 kHz, before rounding
    let times: Vec<Option<f64>> = (0..5).map(|i| Some(i as f64 / 30_000.0)).collect();
    bundle.mean_waveforms.insert(
        950907205,
        UnitWaveforms {
            time: times.clone(),
            channels: vec![
                WaveformChannelSample::new(850126382, vec![0.0, -8.0, 4.0, 1.0, 0.0]),
                WaveformChannelSample::new(850126384, vec![0.0, -2.0, 1.0, 0.5, 0.0]),
            ],
        },
    );
    let mut gapped = times;
    gapped[3] = None;
    bundle.mean_waveforms.insert(
        950907216,
        UnitWaveforms {
            time: gapped,
            channels: vec![
                WaveformChannelSample::new(850126382, vec![0.0, 1.0, -1.0, 0.0, 0.0]),
                WaveformChannelSample::new(850126390, vec![0.0, 6.0, -6.0, 0.0, 0.0]),
            ],
        },
    );

    bundle.running_speed = BehaviorTable {
        timestamps: vec![0.0, 0.016, 0.033],
        columns: vec![],
    }
    .with_column("velocity", vec![Some(1.2), None, Some(0.8)]);

    let stimulus = |id: i64, name: &str, color: Value, sf: &str| {
        let mut attributes = BTreeMap::new();
        attributes.insert(columns::COLOR.to_string(), color);
        attributes.insert(columns::SPATIAL_FREQUENCY.to_string(), Value::from(sf));
        attributes.insert(columns::PHASE.to_string(), Value::from("null"));
        StimulusEvent {
            presentation_id: id,
            start_time: 3.0 + id as f64,
            stop_time: Some(3.25 + id as f64),
            stimulus_name: Value::from(name),
            attributes,
        }
    };
    bundle.stimuli = vec![
        stimulus(0, "flashes", Value::Float64(1.0), "null"),
        stimulus(1, "natural_scenes", Value::from("null"), "null"),
        stimulus(2, "static_gratings", Value::from("null"), "[0.04]"),
        stimulus(3, "flashes", Value::Float64(-1.0), "null"),
    ];
    bundle
}

fn write_cache(root: &std::path::Path) -> CacheDirCatalog {
    let catalog = CacheDirCatalog::new(root);
    let mut attributes = BTreeMap::new();
    attributes.insert("specimen_id".to_string(), Value::Int64(717038288));
    let sessions = vec![SessionDescriptor {
        session_id: SESSION_ID,
        attributes,
    }];
    fs::write(
        root.join("sessions.json"),
        serde_json::to_string(&sessions).unwrap(),
    )
    .unwrap();
    fs::write(
        root.join("channels.json"),
        r#"[{"id": 850126382, "probe_id": 810755797}]"#,
    )
    .unwrap();
    fs::write(
        root.join("units.json"),
        r#"[{"id": 950907205, "snr": 3.2}, {"id": 950907216, "snr": 1.1}]"#,
    )
    .unwrap();

    let path = catalog.bundle_path(SESSION_ID);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    serde_json::to_writer(File::create(&path).unwrap(), &synthetic_bundle()).unwrap();
    catalog
}

#[test]
fn test_end_to_end_synthetic_session() {
    let cache = tempdir().unwrap();
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let catalog = write_cache(cache.path());

    // metadata
    let stats = export_dataset_metadata(&catalog, data.path()).unwrap();
    assert_eq!((stats.sessions, stats.channels, stats.units), (1, 1, 2));
    let ids = read_index_ids_file(data.path().join(ALL_SESSIONS_CSV)).unwrap();
    assert_eq!(ids, vec![SESSION_ID]);
    let descriptor =
        read_session_descriptor(data.path().join("ses-715093703").join(SESSION_DESCRIPTOR))
            .unwrap();
    assert_eq!(descriptor.session_id, SESSION_ID);

    // sessions
    let mut config = TransformConfig::new(data.path());
    config.clear_cache = true;
    let transformer = SessionTransformer::new(&catalog, config);
    let report = transformer.run_batch(ids).unwrap();
    assert!(report.is_success());
    assert_eq!(report.written[0].repaired_units, 1);
    assert!(report.written[0].cache_cleared);
    assert!(!catalog.bundle_path(SESSION_ID).exists());

    let ses = data.path().join("ses-715093703");
    let reader = ReaderConfig::default();
    let units = read_batches(ses.join(UNITS_TABLE), &reader).unwrap();
    assert_eq!(units[0].num_rows(), 2);

    let channels = units[0]
        .column_by_name(columns::MEAN_WAVEFORM_CHANNEL)
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(channels.value(0), 850126382);
    assert_eq!(channels.value(1), 850126390);

    let grids = units[0]
        .column_by_name(columns::MEAN_WAVEFORMS_TIMES)
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    for row in 0..2 {
        let grid = grids.value(row);
        let grid = grid.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(grid.len(), 5);
        assert!(grid.values().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(grid.value(1), 0.000033);
    }

    let file = SerializedFileReader::new(File::open(ses.join(UNITS_TABLE)).unwrap()).unwrap();
    let kv = file.metadata().file_metadata().key_value_metadata().unwrap();
    let lookup = |key: &str| kv.iter().find(|e| e.key == key).and_then(|e| e.value.clone());
    assert_eq!(lookup(KEY_INDEX_COLUMN).as_deref(), Some(columns::UNIT_ID));
    assert_eq!(lookup(KEY_SESSION_ID).as_deref(), Some("715093703"));

    let stimuli = read_batches(ses.join(STIMULI_TABLE), &reader).unwrap();
    let sf = stimuli[0]
        .column_by_name(columns::SPATIAL_FREQUENCY)
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(sf.null_count(), 3);
    assert_eq!(sf.value(2), 0.04);

    // spikes
    let report = SpikeJoiner::default()
        .join_all(data.path(), out.path())
        .unwrap();
    assert!(report.is_success());
    let joined = &report.joined;
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].spikes, 3);
    assert_eq!(joined[0].stimuli, 2);

    let spikes = read_batches(out.path().join("ses-715093703").join(UNITS_TABLE), &reader).unwrap();
    assert_eq!(spikes[0].num_rows(), 3);
    let areas = spikes[0]
        .column_by_name(columns::AREA)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert!((0..3).all(|i| areas.value(i) == "V1"));
}

#[test]
fn test_rerun_without_overwrite_is_a_no_op() {
    let cache = tempdir().unwrap();
    let data = tempdir().unwrap();
    let catalog = write_cache(cache.path());
    let transformer = SessionTransformer::new(&catalog, TransformConfig::new(data.path()));

    assert!(matches!(
        transformer.transform(SESSION_ID).unwrap(),
        SessionOutcome::Written(_)
    ));

    let ses = data.path().join("ses-715093703");
    let mut before = Vec::new();
    for entry in fs::read_dir(&ses).unwrap() {
        let path = entry.unwrap().path();
        before.push((path.clone(), fs::read(&path).unwrap()));
    }

    // the bundle is gone, so any fetch would fail
    catalog.clear_session_cache(SESSION_ID).unwrap();
    assert_eq!(
        transformer.transform(SESSION_ID).unwrap(),
        SessionOutcome::Skipped(SESSION_ID)
    );
    for (path, bytes) in before {
        assert_eq!(fs::read(&path).unwrap(), bytes, "{} changed", path.display());
    }
}
