use serde::Deserialize;

use crate::coerce::{coerce_literal, Coerced, ListNarrowing};
use crate::model::StimulusMarker;
use crate::reader::StimulusRow;
use crate::value::Value;

/// Stimulus kinds kept by default
pub const DEFAULT_STIMULUS_KINDS: [&str; 2] = ["flashes", "natural_scenes"];

/// Color condition kept by default
pub const DEFAULT_REFERENCE_COLOR: f64 = 1.0;

/// Settings for the spike joiner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Stimulus kinds to keep
    pub stimulus_kinds: Vec<String>,
    /// Color a kept presentation must have (missing color also passes)
    pub reference_color: f64,
    /// Drop units whose area is not one of the mapped visual areas
    pub only_mapped_areas: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            stimulus_kinds: DEFAULT_STIMULUS_KINDS.iter().map(|s| s.to_string()).collect(),
            reference_color: DEFAULT_REFERENCE_COLOR,
            only_mapped_areas: false,
        }
    }
}

/// True if the color condition equals `reference` or is absent.
///
/// String colors such as `"1"` or `"[1.0]"` are coerced before comparing.
pub fn color_matches(color: &Value, reference: f64) -> bool {
    match coerce_literal(color, ListNarrowing::First) {
        Coerced::Missing => true,
        Coerced::Parsed(v) | Coerced::Passthrough(v) => v.as_f64() == Some(reference),
    }
}

/// Keep whitelisted kinds with a matching color, projected to (time, kind).
pub fn filter_stimuli(rows: &[StimulusRow], config: &JoinConfig) -> Vec<StimulusMarker> {
    rows.iter()
        .filter(|row| {
            row.stimulus_name
                .as_deref()
                .is_some_and(|kind| config.stimulus_kinds.iter().any(|k| k == kind))
        })
        .filter(|row| color_matches(&row.color, config.reference_color))
        .map(|row| StimulusMarker {
            time: row.start_time,
            kind: row.stimulus_name.clone(),
        })
        .collect()
}
