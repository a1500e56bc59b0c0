//! # Table Schemas
//!
//! Arrow schemas and file names of every table the pipeline emits.
//!
//! ## Session tables (`<data_root>/ses-<id>/`)
//!
//! | File | Key column | Contents |
//! |------|------------|----------|
//! | units.parquet | unit_id | unit attributes, spike train, representative waveform, shared time grid |
//! | running.parquet | start_time | running speed samples |
//! | stimuli.parquet | stimulus_presentation_id | stimulus presentations with coerced conditions |
//! | eyetracking.parquet | time | pupil and gaze samples (only if recorded) |
//!
//! Attribute columns vary between sessions, so the units and stimuli schemas
//! are assembled per session from the fixed fields below plus inferred
//! attribute fields.
//!
//! ## Joined tables (`<out>/ses-<id>/`)
//!
//! | File | Columns |
//! |------|---------|
//! | units.parquet | time, unit, area |
//! | stimuli.parquet | time, kind |

mod builders;
/// Column name constants.
pub mod columns;
mod constants;


pub use builders::{
    create_spike_events_schema, create_spike_events_schema_arc, create_stimulus_markers_schema,
    create_stimulus_markers_schema_arc, float_list_field, stimulus_key_fields,
    unit_enrichment_fields,
};
pub use columns::*;
pub use constants::*;
