use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{BehaviorTable, RawUnit, StimulusEvent};
use crate::waveform::UnitWaveforms;

/// Everything recorded in one session, as delivered by a catalog provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionBundle {
    /// Session identifier
    #[serde(default)]
    pub session_id: i64,
    /// Unit records
    #[serde(default)]
    pub units: Vec<RawUnit>,
    /// Spike times per unit id
    #[serde(default)]
    pub spike_times: BTreeMap<i64, Vec<f64>>,
    /// Mean waveforms per unit id
    #[serde(default)]
    pub mean_waveforms: BTreeMap<i64, UnitWaveforms>,
    /// Running speed, always recorded
    pub running_speed: BehaviorTable,
    /// Pupil tracking, absent for some animals
    #[serde(default)]
    pub pupil: Option<BehaviorTable>,
    /// Screen gaze mapping, absent for some animals
    #[serde(default)]
    pub gaze: Option<BehaviorTable>,
    /// Stimulus presentation table
    #[serde(default)]
    pub stimuli: Vec<StimulusEvent>,
}

impl SessionBundle {
    /// Empty bundle for a session
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            ..Default::default()
        }
    }
}
