//! # Session Transformer
//!
//! Turns one raw [`SessionBundle`](crate::catalog::SessionBundle) into four
//! Parquet tables under `<data_root>/ses-<id>/`:
//!
//! | File | Index column | Content |
//! |------|--------------|---------|
//! | `units.parquet` | `unit_id` | unit attributes, spike train, representative waveform, time grid |
//! | `running.parquet` | `start_time` | running speed |
//! | `stimuli.parquet` | `stimulus_presentation_id` | cleaned stimulus presentations |
//! | `eyetracking.parquet` | `time` | pupil and gaze, only when pupil data exists |
//!
//! A session whose `units.parquet` exists is skipped before anything is
//! fetched, unless overwrite is enabled. Failures are per session:
//! [`SessionTransformer::run_batch`] records them and moves on.

mod behavior;
mod error;
mod outcome;
mod stimuli;
mod transformer;

#[cfg(test)]
mod tests;

pub use behavior::{merge_eye_tracking, validate_behavior};
pub use error::{FaultKind, SessionError};
pub use outcome::{BatchReport, SessionOutcome, SessionStats};
pub use stimuli::{coerce_condition_fields, normalize_null_sentinels, CoercionSummary};
pub use transformer::{SessionTables, SessionTransformer, TransformConfig, DEFAULT_COERCE_FIELDS};
