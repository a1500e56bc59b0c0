use log::debug;

use super::WaveformError;

/// Decimal precision of the shared waveform time grid
pub const GRID_DECIMALS: i32 = 6;

/// Round to `decimals` places, ties to even.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// The time grid shared by every unit of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedTimeGrid {
    /// Rounded, strictly increasing sample times
    pub times: Vec<f64>,
    /// Units whose axis was replaced by the first unit's axis
    pub repaired_units: Vec<i64>,
}

impl SharedTimeGrid {
    /// Number of grid points
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the session had no units
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

fn same_point(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn round_axis(axis: &[Option<f64>]) -> Vec<f64> {
    axis.iter()
        .map(|t| round_to_decimals(t.unwrap_or(f64::NAN), GRID_DECIMALS))
        .collect()
}

fn has_missing(axis: &[Option<f64>]) -> bool {
    axis.iter().any(|t| t.map_or(true, f64::is_nan))
}

/// Reconcile per-unit waveform time axes onto one shared grid.
///
/// Every axis after the first that contains a missing sample adopts the first
/// unit's axis. All rounded axes must then be identical and strictly
/// increasing; anything else is a fault for the whole session.
pub fn reconcile_time_axes<'a, I>(axes: I) -> Result<SharedTimeGrid, WaveformError>
where
    I: IntoIterator<Item = (i64, &'a [Option<f64>])>,
{
    let mut axes = axes.into_iter();
    let Some((first_unit, first_axis)) = axes.next() else {
        return Ok(SharedTimeGrid::default());
    };

    let reference = round_axis(first_axis);
    check_monotonic(first_unit, &reference)?;

    let mut repaired_units = Vec::new();
    for (unit_id, axis) in axes {
        if has_missing(axis) {
            debug!("unit {}: missing waveform times, adopting the first unit's axis", unit_id);
            repaired_units.push(unit_id);
            continue;
        }

        let rounded = round_axis(axis);
        if rounded.len() != reference.len() {
            return Err(WaveformError::GridLengthMismatch {
                unit_id,
                expected: reference.len(),
                found: rounded.len(),
            });
        }
        if let Some(position) = rounded
            .iter()
            .zip(&reference)
            .position(|(a, b)| !same_point(*a, *b))
        {
            return Err(WaveformError::GridMismatch { unit_id, position });
        }
        check_monotonic(unit_id, &rounded)?;
    }

    Ok(SharedTimeGrid {
        times: reference,
        repaired_units,
    })
}

fn check_monotonic(unit_id: i64, grid: &[f64]) -> Result<(), WaveformError> {
    if let Some(position) = grid.iter().position(|t| t.is_nan()) {
        return Err(WaveformError::NonMonotonic { unit_id, position });
    }
    match grid.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(WaveformError::NonMonotonic {
            unit_id,
            position: i + 1,
        }),
        None => Ok(()),
    }
}
