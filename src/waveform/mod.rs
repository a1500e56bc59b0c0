//! # Waveform Reduction
//!
//! Per-unit mean waveforms arrive as one amplitude trace per recording channel.
//! This module reduces them to what the units table stores:
//!
//! - [`select_channel`]: the channel with the largest peak-to-peak amplitude
//! - [`reconcile_time_axes`]: one rounded time grid shared by all units

mod error;
mod grid;
mod selector;

pub use error::WaveformError;
pub use grid::{reconcile_time_axes, round_to_decimals, SharedTimeGrid, GRID_DECIMALS};
pub use selector::{peak_to_peak, select_channel, ChannelSelection, WaveformChannelSample};

use serde::{Deserialize, Serialize};

/// All mean-waveform traces of one unit over its time axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitWaveforms {
    /// Sample times, `null` where the source has no value
    pub time: Vec<Option<f64>>,
    /// One trace per recording channel
    pub channels: Vec<WaveformChannelSample>,
}
