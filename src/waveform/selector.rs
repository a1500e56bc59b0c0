use serde::{Deserialize, Serialize};

use super::WaveformError;

/// Mean waveform recorded on one channel for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformChannelSample {
    /// Recording channel identifier
    pub channel_id: i64,
    /// Amplitude trace over the unit's waveform time axis
    #[serde(rename = "data")]
    pub amplitudes: Vec<f64>,
}

impl WaveformChannelSample {
    /// Create a sample for one channel
    pub fn new(channel_id: i64, amplitudes: Vec<f64>) -> Self {
        Self {
            channel_id,
            amplitudes,
        }
    }
}

/// The representative channel picked for a unit
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSelection<'a> {
    /// Position of the channel in the input
    pub index: usize,
    /// Selected channel identifier
    pub channel_id: i64,
    /// Peak-to-peak amplitude of the selected trace
    pub peak_to_peak: f64,
    /// Selected amplitude trace
    pub amplitudes: &'a [f64],
}

/// Max minus min of a trace. NaN samples are ignored; an all-NaN or empty
/// trace yields NaN.
pub fn peak_to_peak(amplitudes: &[f64]) -> f64 {
    let (min, max) = amplitudes
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        f64::NAN
    } else {
        max - min
    }
}

/// Pick the channel with the largest peak-to-peak amplitude.
///
/// Ties go to the channel that comes first in `channels`. A NaN range never
/// wins against a finite one.
pub fn select_channel(
    unit_id: i64,
    channels: &[WaveformChannelSample],
) -> Result<ChannelSelection<'_>, WaveformError> {
    let mut best: Option<(usize, f64)> = None;
    for (index, channel) in channels.iter().enumerate() {
        if channel.amplitudes.is_empty() {
            return Err(WaveformError::EmptyChannel {
                unit_id,
                channel_id: channel.channel_id,
            });
        }
        let range = peak_to_peak(&channel.amplitudes);
        let rank = if range.is_nan() { f64::NEG_INFINITY } else { range };
        match best {
            Some((_, best_rank)) if rank <= best_rank => {}
            _ => best = Some((index, rank)),
        }
    }

    let (index, _) = best.ok_or(WaveformError::NoChannels { unit_id })?;
    let channel = &channels[index];
    Ok(ChannelSelection {
        index,
        channel_id: channel.channel_id,
        peak_to_peak: peak_to_peak(&channel.amplitudes),
        amplitudes: &channel.amplitudes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn channel_with_range(channel_id: i64, range: f64) -> WaveformChannelSample {
        WaveformChannelSample::new(channel_id, vec![0.0, -range / 2.0, range / 2.0, 0.0])
    }

    #[test]
    fn test_peak_to_peak() {
        assert_eq!(peak_to_peak(&[1.0, -2.0, 3.0]), 5.0);
        assert_eq!(peak_to_peak(&[4.0]), 0.0);
        assert!(peak_to_peak(&[]).is_nan());
        assert_eq!(peak_to_peak(&[f64::NAN, 1.0, 2.0]), 1.0);
    }

    #[test]
    fn test_tie_goes_to_first_channel() {
        let channels: Vec<_> = [3.0, 7.0, 7.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| channel_with_range(100 + i as i64, r))
            .collect();

        let selection = select_channel(1, &channels).unwrap();
        assert_eq!(selection.index, 1);
        assert_eq!(selection.channel_id, 101);
        assert_eq!(selection.peak_to_peak, 7.0);
        assert_eq!(selection.amplitudes, channels[1].amplitudes.as_slice());
    }

    #[test]
    fn test_no_channels_is_fault() {
        let result = select_channel(9, &[]);
        assert_eq!(result, Err(WaveformError::NoChannels { unit_id: 9 }));
    }

    #[test]
    fn test_empty_trace_is_fault() {
        let channels = vec![WaveformChannelSample::new(5, vec![])];
        assert!(matches!(
            select_channel(1, &channels),
            Err(WaveformError::EmptyChannel { channel_id: 5, .. })
        ));
    }

    #[test]
    fn test_nan_channel_loses() {
        let channels = vec![
            WaveformChannelSample::new(1, vec![f64::NAN, f64::NAN]),
            WaveformChannelSample::new(2, vec![0.0, 1.0]),
        ];
        assert_eq!(select_channel(1, &channels).unwrap().channel_id, 2);
    }

    proptest! {
        #[test]
        fn prop_selects_first_maximum(ranges in prop::collection::vec(0u8..10, 1..16)) {
            let channels: Vec<_> = ranges
                .iter()
                .enumerate()
                .map(|(i, &r)| channel_with_range(i as i64, r as f64))
                .collect();
            let max = *ranges.iter().max().unwrap();
            let expected = ranges.iter().position(|&r| r == max).unwrap();
            prop_assert_eq!(select_channel(0, &channels).unwrap().index, expected);
        }
    }
}
