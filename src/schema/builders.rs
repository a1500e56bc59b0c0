use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use super::columns;

/// Field of a list of non-null Float64 items
pub fn float_list_field(name: &str, nullable: bool) -> Field {
    Field::new(
        name,
        DataType::List(Arc::new(Field::new("item", DataType::Float64, false))),
        nullable,
    )
}

/// Fields that follow the attribute columns of the units table
pub fn unit_enrichment_fields() -> Vec<Field> {
    vec![
        float_list_field(columns::SPIKE_TIMES, false),
        float_list_field(columns::MEAN_WAVEFORM, false),
        Field::new(columns::MEAN_WAVEFORM_CHANNEL, DataType::Int64, true),
        float_list_field(columns::MEAN_WAVEFORMS_TIMES, false),
    ]
}

/// Leading fields of the session stimulus table
pub fn stimulus_key_fields() -> Vec<Field> {
    vec![
        Field::new(columns::STIMULUS_PRESENTATION_ID, DataType::Int64, false),
        Field::new(columns::START_TIME, DataType::Float64, false),
        Field::new(columns::STOP_TIME, DataType::Float64, true),
        Field::new(columns::STIMULUS_NAME, DataType::Utf8, true),
    ]
}

/// Schema of the joined spike table: one row per spike.
///
/// ```
/// use ecephys_tables::schema::create_spike_events_schema;
///
/// let schema = create_spike_events_schema();
/// assert_eq!(schema.fields().len(), 3);
/// ```
pub fn create_spike_events_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::TIME, DataType::Float64, false),
        Field::new(columns::UNIT, DataType::Int64, false),
        Field::new(columns::AREA, DataType::Utf8, true),
    ])
}

/// Arc-wrapped spike table schema
pub fn create_spike_events_schema_arc() -> SchemaRef {
    Arc::new(create_spike_events_schema())
}

/// Schema of the joined stimulus table: onset time and kind.
pub fn create_stimulus_markers_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::TIME, DataType::Float64, false),
        Field::new(columns::KIND, DataType::Utf8, true),
    ])
}

/// Arc-wrapped stimulus marker schema
pub fn create_stimulus_markers_schema_arc() -> SchemaRef {
    Arc::new(create_stimulus_markers_schema())
}
