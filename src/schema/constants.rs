/// Output format version - follows semantic versioning
pub const FORMAT_VERSION: &str = "1.0.0";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "ecephys:format_version";

/// Metadata key for the creation timestamp
pub const KEY_CREATED: &str = "ecephys:created";

/// Metadata key for producer software info
pub const KEY_PRODUCER: &str = "ecephys:producer";

/// Metadata key naming the table kind
pub const KEY_TABLE: &str = "ecephys:table";

/// Metadata key naming the logical index column
pub const KEY_INDEX_COLUMN: &str = "ecephys:index_column";

/// Metadata key for the source session
pub const KEY_SESSION_ID: &str = "ecephys:session_id";

/// File name of the units table
pub const UNITS_TABLE: &str = "units.parquet";
/// File name of the running speed table
pub const RUNNING_TABLE: &str = "running.parquet";
/// File name of the stimulus table
pub const STIMULI_TABLE: &str = "stimuli.parquet";
/// File name of the eye-tracking table
pub const EYETRACKING_TABLE: &str = "eyetracking.parquet";
/// File name of the session descriptor
pub const SESSION_DESCRIPTOR: &str = "session.json";

/// Prefix of per-session directories
pub const SESSION_DIR_PREFIX: &str = "ses-";

/// Directory name for a session
pub fn session_dir_name(session_id: i64) -> String {
    format!("{}{}", SESSION_DIR_PREFIX, session_id)
}

/// Parse a session id back out of a directory name
pub fn parse_session_dir_name(name: &str) -> Option<i64> {
    name.strip_prefix(SESSION_DIR_PREFIX)?.parse().ok()
}
