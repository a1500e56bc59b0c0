//! Record types shared by the catalog, the session transformer and the joiner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Open-ended attribute map, ordered by name
pub type Attributes = BTreeMap<String, Value>;

/// One row of the session index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Session identifier
    #[serde(rename = "id")]
    pub session_id: i64,
    /// Session-level attributes (animal, probe count, ...)
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// One row of a dataset-wide index (channels or units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Record identifier
    pub id: i64,
    /// All other fields
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Unit as delivered in a raw session bundle, before enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUnit {
    /// Unit identifier, unique within the session
    pub unit_id: i64,
    /// Structural and location attributes
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// One stimulus presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusEvent {
    /// Presentation index
    #[serde(rename = "stimulus_presentation_id")]
    pub presentation_id: i64,
    /// Onset time in seconds
    pub start_time: f64,
    /// Offset time in seconds
    #[serde(default)]
    pub stop_time: Option<f64>,
    /// Stimulus kind
    #[serde(default)]
    pub stimulus_name: Value,
    /// Condition attributes (color, spatial_frequency, phase, ...)
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl StimulusEvent {
    /// Stimulus kind as text, if present
    pub fn kind(&self) -> Option<&str> {
        self.stimulus_name.as_str()
    }
}

/// A named numeric column of a behavioral table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorColumn {
    /// Column name
    pub name: String,
    /// Samples, aligned with the table's timestamps
    pub values: Vec<Option<f64>>,
}

/// Timestamp-indexed behavioral samples (running speed, pupil, gaze)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTable {
    /// Sample timestamps in seconds
    pub timestamps: Vec<f64>,
    /// Measurement columns
    #[serde(default)]
    pub columns: Vec<BehaviorColumn>,
}

impl BehaviorTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True if the table holds no samples
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Append a column
    pub fn with_column(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.columns.push(BehaviorColumn {
            name: name.to_string(),
            values,
        });
        self
    }
}

/// A unit after session transformation
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    /// Unit identifier
    pub unit_id: i64,
    /// Structural and location attributes
    pub attributes: Attributes,
    /// Spike times in seconds
    pub spike_times: Vec<f64>,
    /// Amplitude trace of the representative channel
    pub mean_waveform: Vec<f64>,
    /// Channel the representative trace was recorded on
    pub mean_waveform_channel: Option<i64>,
    /// Shared waveform time grid
    pub mean_waveforms_times: Vec<f64>,
}

impl UnitRecord {
    /// Start enrichment from a raw unit and its spike train
    pub fn new(raw: RawUnit, spike_times: Vec<f64>) -> Self {
        Self {
            unit_id: raw.unit_id,
            attributes: raw.attributes,
            spike_times,
            mean_waveform: Vec::new(),
            mean_waveform_channel: None,
            mean_waveforms_times: Vec::new(),
        }
    }
}

/// One spike of one unit, tagged with the unit's area
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeEvent {
    /// Spike time in seconds
    pub time: f64,
    /// Emitting unit
    pub unit: i64,
    /// Canonical area label
    pub area: Option<String>,
}

/// A stimulus onset kept by the joiner
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusMarker {
    /// Onset time in seconds
    pub time: f64,
    /// Stimulus kind
    pub kind: Option<String>,
}
