//! Stimulus table cleanup: null sentinels and string-encoded conditions.

use log::debug;

use crate::coerce::{coerce_literal, is_null_sentinel, Coerced, ListNarrowing};
use crate::model::StimulusEvent;
use crate::value::Value;

/// Counts from coercing condition fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionSummary {
    /// Cells parsed into native values
    pub parsed: usize,
    /// Cells left as they were
    pub passthrough: usize,
    /// Cells that ended up missing
    pub missing: usize,
}

/// Replace every `"null"` cell (kind and attributes) with [`Value::Null`].
///
/// Returns the number of replaced cells.
pub fn normalize_null_sentinels(events: &mut [StimulusEvent]) -> usize {
    let mut replaced = 0;
    for event in events.iter_mut() {
        let cells = std::iter::once(&mut event.stimulus_name).chain(event.attributes.values_mut());
        for cell in cells {
            if is_null_sentinel(cell) {
                *cell = Value::Null;
                replaced += 1;
            }
        }
    }
    replaced
}

/// Coerce the named condition fields in place.
///
/// Rows that lack a field are left without it.
pub fn coerce_condition_fields(
    events: &mut [StimulusEvent],
    fields: &[String],
    narrowing: ListNarrowing,
) -> CoercionSummary {
    let mut summary = CoercionSummary::default();
    for event in events.iter_mut() {
        for field in fields {
            let Some(cell) = event.attributes.get_mut(field) else {
                continue;
            };
            let coerced = coerce_literal(cell, narrowing);
            match &coerced {
                Coerced::Parsed(_) => summary.parsed += 1,
                Coerced::Missing => summary.missing += 1,
                Coerced::Passthrough(v) => {
                    if v.as_str().is_some() {
                        debug!(
                            "presentation {}: {} value {:?} is not a literal, kept as is",
                            event.presentation_id, field, v
                        );
                    }
                    summary.passthrough += 1;
                }
            }
            *cell = coerced.into_value();
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;

    fn event(id: i64, name: &str, attrs: &[(&str, Value)]) -> StimulusEvent {
        StimulusEvent {
            presentation_id: id,
            start_time: id as f64,
            stop_time: Some(id as f64 + 0.25),
            stimulus_name: Value::from(name),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<Attributes>(),
        }
    }

    #[test]
    fn test_null_sentinel_replacement() {
        let mut events = vec![
            event(0, "flashes", &[("color", Value::from("null"))]),
            event(1, "flashes", &[("color", Value::Int64(1))]),
            event(2, "flashes", &[("color", Value::Int64(0))]),
        ];
        assert_eq!(normalize_null_sentinels(&mut events), 1);

        let missing = events
            .iter()
            .filter(|e| e.attributes["color"].is_missing())
            .count();
        assert_eq!(missing, 1);
        assert_eq!(events[1].attributes["color"], Value::Int64(1));
        assert_eq!(events[2].attributes["color"], Value::Int64(0));
    }

    #[test]
    fn test_null_kind_is_replaced() {
        let mut events = vec![event(0, "null", &[])];
        normalize_null_sentinels(&mut events);
        assert_eq!(events[0].stimulus_name, Value::Null);
        assert_eq!(events[0].kind(), None);
    }

    #[test]
    fn test_coerce_condition_fields() {
        let mut events = vec![
            event(
                0,
                "static_gratings",
                &[
                    ("spatial_frequency", Value::from("[0.04]")),
                    ("phase", Value::from("0.25")),
                    ("orientation", Value::from("[30.0]")),
                ],
            ),
            event(1, "static_gratings", &[("phase", Value::from("abc"))]),
            event(2, "spontaneous", &[("phase", Value::Null)]),
        ];
        let fields = vec!["spatial_frequency".to_string(), "phase".to_string()];
        let summary = coerce_condition_fields(&mut events, &fields, ListNarrowing::First);

        assert_eq!(
            summary,
            CoercionSummary {
                parsed: 2,
                passthrough: 1,
                missing: 1
            }
        );
        assert_eq!(events[0].attributes["spatial_frequency"], Value::Float64(0.04));
        assert_eq!(events[0].attributes["phase"], Value::Float64(0.25));
        // not a coerced field
        assert_eq!(events[0].attributes["orientation"], Value::from("[30.0]"));
        assert_eq!(events[1].attributes["phase"], Value::from("abc"));
        assert!(!events[1].attributes.contains_key("spatial_frequency"));
    }
}
