use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::schema::columns;
use crate::value::Value;

use super::utils::{
    f64_list_at, get_float64_column, get_int64_column, get_list_column, get_optional_column,
    value_at,
};
use super::{ReaderConfig, ReaderError};

/// Spike train and area of one unit, as read back from a units table
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpikeTrain {
    /// Unit identifier
    pub unit_id: i64,
    /// Recorded area code; `None` when missing or the table has no area column
    pub area: Option<String>,
    /// Spike times in seconds
    pub spike_times: Vec<f64>,
}

/// Onset, kind and color of one presentation, as read back from a stimulus table
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusRow {
    /// Onset time in seconds
    pub start_time: f64,
    /// Stimulus kind
    pub stimulus_name: Option<String>,
    /// Color condition; [`Value::Null`] when the table has no color column
    pub color: Value,
}

/// Read every record batch of a Parquet file (eager)
pub fn read_batches<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> Result<Vec<RecordBatch>, ReaderError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(config.batch_size)
        .build()?;
    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

fn optional_text(array: &dyn Array, row: usize) -> Result<Option<String>, ReaderError> {
    Ok(match value_at(array, row)? {
        Value::Null => None,
        Value::Utf8(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Read `unit_id`, area and spike times from a session units table.
pub fn read_unit_spike_trains<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> Result<Vec<UnitSpikeTrain>, ReaderError> {
    let mut units = Vec::new();
    for batch in read_batches(path, config)? {
        let ids = get_int64_column(&batch, columns::UNIT_ID)?;
        // absent when no unit carried an area
        let areas = get_optional_column(&batch, columns::STRUCTURE_ACRONYM);
        let spikes = get_list_column(&batch, columns::SPIKE_TIMES)?;

        for row in 0..batch.num_rows() {
            let area = match areas {
                Some(areas) => optional_text(areas, row)?,
                None => None,
            };
            units.push(UnitSpikeTrain {
                unit_id: ids.value(row),
                area,
                spike_times: f64_list_at(spikes, row)?,
            });
        }
    }
    Ok(units)
}

/// Read onset, kind and color from a session stimulus table.
pub fn read_stimulus_rows<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> Result<Vec<StimulusRow>, ReaderError> {
    let mut rows = Vec::new();
    for batch in read_batches(path, config)? {
        let starts = get_float64_column(&batch, columns::START_TIME)?;
        let names = get_optional_column(&batch, columns::STIMULUS_NAME)
            .ok_or_else(|| ReaderError::ColumnNotFound(columns::STIMULUS_NAME.to_string()))?;
        let colors = get_optional_column(&batch, columns::COLOR);

        for row in 0..batch.num_rows() {
            rows.push(StimulusRow {
                start_time: starts.value(row),
                stimulus_name: optional_text(names, row)?,
                color: match colors {
                    Some(array) => value_at(array, row)?,
                    None => Value::Null,
                },
            });
        }
    }
    Ok(rows)
}
