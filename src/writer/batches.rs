//! Record batch assembly for each emitted table.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::model::{BehaviorTable, SpikeEvent, StimulusEvent, StimulusMarker, UnitRecord};
use crate::schema::{
    columns, create_spike_events_schema_arc, create_stimulus_markers_schema_arc,
    stimulus_key_fields, unit_enrichment_fields,
};
use crate::value::Value;

use super::columns::{
    attribute_columns, attribute_names, build_f64_array, build_f64_list_array, build_i64_array,
    build_optional_f64_array, build_optional_str_array, build_value_array, ColumnKind,
};
use super::error::WriterError;

fn assemble(fields: Vec<Field>, arrays: Vec<ArrayRef>) -> Result<RecordBatch, WriterError> {
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Units table: `unit_id`, attributes, spike train, waveform and time grid.
pub fn units_batch(units: &[UnitRecord]) -> Result<RecordBatch, WriterError> {
    let enrichment = unit_enrichment_fields();
    let mut reserved = vec![columns::UNIT_ID];
    reserved.extend(enrichment.iter().map(|f| f.name().as_str()));

    let attrs: Vec<_> = units.iter().map(|u| &u.attributes).collect();
    let names = attribute_names(attrs.iter().copied(), &reserved);

    let mut fields = vec![Field::new(columns::UNIT_ID, DataType::Int64, false)];
    let ids: Vec<i64> = units.iter().map(|u| u.unit_id).collect();
    let mut arrays = vec![build_i64_array(&ids)];

    for (field, array) in attribute_columns(&attrs, &names) {
        fields.push(field);
        arrays.push(array);
    }

    fields.extend(enrichment);
    arrays.push(build_f64_list_array(units.iter().map(|u| u.spike_times.as_slice())));
    arrays.push(build_f64_list_array(units.iter().map(|u| u.mean_waveform.as_slice())));
    arrays.push(Arc::new(arrow::array::Int64Array::from(
        units
            .iter()
            .map(|u| u.mean_waveform_channel)
            .collect::<Vec<_>>(),
    )));
    arrays.push(build_f64_list_array(
        units.iter().map(|u| u.mean_waveforms_times.as_slice()),
    ));

    assemble(fields, arrays)
}

/// Stimulus table: presentation id, onset, offset, kind and condition attributes.
pub fn stimuli_batch(events: &[StimulusEvent]) -> Result<RecordBatch, WriterError> {
    let mut fields = stimulus_key_fields();
    let reserved: Vec<&str> = fields.iter().map(|f| f.name().as_str()).collect();

    let attrs: Vec<_> = events.iter().map(|e| &e.attributes).collect();
    let names = attribute_names(attrs.iter().copied(), &reserved);

    let ids: Vec<i64> = events.iter().map(|e| e.presentation_id).collect();
    let starts: Vec<f64> = events.iter().map(|e| e.start_time).collect();
    let stops: Vec<Option<f64>> = events.iter().map(|e| e.stop_time).collect();
    let kinds: Vec<Option<&Value>> = events.iter().map(|e| Some(&e.stimulus_name)).collect();

    let mut arrays = vec![
        build_i64_array(&ids),
        build_f64_array(&starts),
        build_optional_f64_array(&stops),
        build_value_array(ColumnKind::Utf8, &kinds),
    ];

    for (field, array) in attribute_columns(&attrs, &names) {
        fields.push(field);
        arrays.push(array);
    }

    assemble(fields, arrays)
}

/// Behavioral table: a Float64 index column named `index_name` plus measurement columns.
pub fn behavior_batch(table: &BehaviorTable, index_name: &str) -> Result<RecordBatch, WriterError> {
    let mut fields = vec![Field::new(index_name, DataType::Float64, false)];
    let mut arrays = vec![build_f64_array(&table.timestamps)];

    for column in &table.columns {
        if column.values.len() != table.len() {
            return Err(WriterError::ColumnLengthMismatch {
                column: column.name.clone(),
                expected: table.len(),
                found: column.values.len(),
            });
        }
        if column.name == index_name {
            return Err(WriterError::InvalidData(format!(
                "column '{}' collides with the index column",
                column.name
            )));
        }
        fields.push(Field::new(&column.name, DataType::Float64, true));
        arrays.push(build_optional_f64_array(&column.values));
    }

    assemble(fields, arrays)
}

/// Joined spike table: one row per spike.
pub fn spike_events_batch(events: &[SpikeEvent]) -> Result<RecordBatch, WriterError> {
    let times: Vec<f64> = events.iter().map(|e| e.time).collect();
    let units: Vec<i64> = events.iter().map(|e| e.unit).collect();
    let arrays = vec![
        build_f64_array(&times),
        build_i64_array(&units),
        build_optional_str_array(events.iter().map(|e| e.area.as_deref())),
    ];
    Ok(RecordBatch::try_new(create_spike_events_schema_arc(), arrays)?)
}

/// Joined stimulus table: onset time and kind.
pub fn stimulus_markers_batch(markers: &[StimulusMarker]) -> Result<RecordBatch, WriterError> {
    let times: Vec<f64> = markers.iter().map(|m| m.time).collect();
    let arrays = vec![
        build_f64_array(&times),
        build_optional_str_array(markers.iter().map(|m| m.kind.as_deref())),
    ];
    Ok(RecordBatch::try_new(create_stimulus_markers_schema_arc(), arrays)?)
}
