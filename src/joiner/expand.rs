use log::debug;

use crate::model::SpikeEvent;
use crate::reader::UnitSpikeTrain;

use super::areas::canonical_area;

/// One row per spike, tagged with the unit and its area.
///
/// Mapped structure codes are relabelled; any other code (or a missing one) is
/// kept as is. With `only_mapped` set, units outside the mapped areas are
/// dropped instead.
pub fn expand_spike_trains(units: &[UnitSpikeTrain], only_mapped: bool) -> Vec<SpikeEvent> {
    let total: usize = units.iter().map(|u| u.spike_times.len()).sum();
    let mut events = Vec::with_capacity(total);

    for unit in units {
        let area = match unit.area.as_deref().and_then(canonical_area) {
            Some(label) => Some(label.to_string()),
            None if !only_mapped => unit.area.clone(),
            None => {
                debug!(
                    "unit {}: area {:?} is not mapped, dropping {} spikes",
                    unit.unit_id,
                    unit.area,
                    unit.spike_times.len()
                );
                continue;
            }
        };
        events.extend(unit.spike_times.iter().map(|&time| SpikeEvent {
            time,
            unit: unit.unit_id,
            area: area.clone(),
        }));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn train(unit_id: i64, area: &str, spikes: &[f64]) -> UnitSpikeTrain {
        UnitSpikeTrain {
            unit_id,
            area: Some(area.to_string()),
            spike_times: spikes.to_vec(),
        }
    }

    #[test]
    fn test_expansion_multiplicity() {
        let units = vec![
            train(1, "VISp", &[0.1, 0.2, 0.3]),
            train(2, "VISl", &[]),
            train(3, "VISam", &[0.15]),
        ];
        let events = expand_spike_trains(&units, false);
        assert_eq!(events.len(), 4);
        assert!(events[..3].iter().all(|e| e.unit == 1 && e.area.as_deref() == Some("V1")));
        assert_eq!(events[3].area.as_deref(), Some("AM"));
        assert_eq!(events[3].time, 0.15);
    }

    #[test]
    fn test_unmapped_areas_keep_raw_code() {
        let mut units = vec![train(1, "CA1", &[0.1, 0.2]), train(2, "VISpm", &[0.3])];
        units.push(UnitSpikeTrain {
            unit_id: 3,
            area: None,
            spike_times: vec![0.4],
        });

        let events = expand_spike_trains(&units, false);
        assert_eq!(events.len(), 4);
        assert_eq!(events.iter().filter(|e| e.unit == 1).count(), 2);
        assert_eq!(events[0].area.as_deref(), Some("CA1"));
        assert_eq!(events[2].area.as_deref(), Some("PM"));
        assert_eq!(events[3].area, None);
    }

    #[test]
    fn test_only_mapped_areas() {
        let units = vec![
            train(1, "CA1", &[0.1, 0.2]),
            train(2, "VISpm", &[0.3]),
            UnitSpikeTrain {
                unit_id: 3,
                area: None,
                spike_times: vec![0.4],
            },
        ];
        let events = expand_spike_trains(&units, true);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].area.as_deref(), Some("PM"));
    }

    proptest! {
        #[test]
        fn prop_rows_per_unit_equal_spike_count(
            counts in proptest::collection::vec(0usize..20, 0..8)
        ) {
            let units: Vec<_> = counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    let spikes: Vec<f64> = (0..n).map(|k| k as f64 * 0.01).collect();
                    let area = if i % 2 == 0 { "VISp" } else { "CA1" };
                    train(i as i64, area, &spikes)
                })
                .collect();
            let events = expand_spike_trains(&units, false);
            for (i, &n) in counts.iter().enumerate() {
                prop_assert_eq!(events.iter().filter(|e| e.unit == i as i64).count(), n);
            }
        }
    }
}
