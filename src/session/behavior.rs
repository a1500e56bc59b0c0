//! Behavioral table checks and the pupil/gaze merge.

use crate::model::BehaviorTable;

use super::SessionError;

fn same_time(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Check that every column has one value per timestamp and that names are unique.
pub fn validate_behavior(table: &BehaviorTable, name: &str) -> Result<(), SessionError> {
    let inconsistent = |reason: String| SessionError::InconsistentBehavior {
        table: name.to_string(),
        reason,
    };
    for (i, column) in table.columns.iter().enumerate() {
        if column.values.len() != table.len() {
            return Err(inconsistent(format!(
                "column '{}' has {} values for {} timestamps",
                column.name,
                column.values.len(),
                table.len()
            )));
        }
        if table.columns[..i].iter().any(|c| c.name == column.name) {
            return Err(inconsistent(format!("duplicate column '{}'", column.name)));
        }
    }
    Ok(())
}

/// Combine pupil and gaze samples into one eye-tracking table.
///
/// Without pupil data there is no eye-tracking table. When both are present
/// their timestamps must match exactly; gaze columns are appended after the
/// pupil columns.
pub fn merge_eye_tracking(
    pupil: Option<BehaviorTable>,
    gaze: Option<BehaviorTable>,
) -> Result<Option<BehaviorTable>, SessionError> {
    let Some(mut pupil) = pupil else {
        return Ok(None);
    };
    validate_behavior(&pupil, "pupil")?;

    let Some(gaze) = gaze else {
        return Ok(Some(pupil));
    };
    validate_behavior(&gaze, "gaze")?;

    let mismatch = pupil
        .timestamps
        .iter()
        .zip(&gaze.timestamps)
        .position(|(a, b)| !same_time(*a, *b))
        .or_else(|| {
            (pupil.len() != gaze.len()).then(|| pupil.len().min(gaze.len()))
        });
    if let Some(position) = mismatch {
        return Err(SessionError::EyeTrackingIndexMismatch {
            pupil: pupil.len(),
            gaze: gaze.len(),
            position,
        });
    }

    pupil.columns.extend(gaze.columns);
    validate_behavior(&pupil, "eye tracking")?;
    Ok(Some(pupil))
}
