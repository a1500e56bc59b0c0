//! Column names of the emitted tables.

/// Unit identifier (session units table)
pub const UNIT_ID: &str = "unit_id";
/// Spike train of a unit
pub const SPIKE_TIMES: &str = "spike_times";
/// Representative mean waveform of a unit
pub const MEAN_WAVEFORM: &str = "mean_waveform";
/// Channel of the representative waveform
pub const MEAN_WAVEFORM_CHANNEL: &str = "mean_waveform_channel";
/// Shared waveform time grid
pub const MEAN_WAVEFORMS_TIMES: &str = "mean_waveforms_times";
/// Recorded brain area of a unit
pub const STRUCTURE_ACRONYM: &str = "ecephys_structure_acronym";

/// Presentation index (session stimuli table)
pub const STIMULUS_PRESENTATION_ID: &str = "stimulus_presentation_id";
/// Presentation onset
pub const START_TIME: &str = "start_time";
/// Presentation offset
pub const STOP_TIME: &str = "stop_time";
/// Stimulus kind
pub const STIMULUS_NAME: &str = "stimulus_name";
/// Stimulus color condition
pub const COLOR: &str = "color";
/// Grating spatial frequency condition
pub const SPATIAL_FREQUENCY: &str = "spatial_frequency";
/// Grating phase condition
pub const PHASE: &str = "phase";

/// Time index of eye-tracking and joined tables
pub const TIME: &str = "time";
/// Unit identifier in joined spike tables
pub const UNIT: &str = "unit";
/// Canonical area label in joined spike tables
pub const AREA: &str = "area";
/// Stimulus kind in joined stimulus tables
pub const KIND: &str = "kind";
