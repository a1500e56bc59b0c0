use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::SessionDescriptor;
use crate::schema::SESSION_DESCRIPTOR;

use super::MetadataError;

/// Write `session.json` into a session directory, creating it if needed.
///
/// The session id is stored alongside the attributes under `id`.
pub fn write_session_descriptor<P: AsRef<Path>>(
    session_dir: P,
    descriptor: &SessionDescriptor,
) -> Result<PathBuf, MetadataError> {
    let session_dir = session_dir.as_ref();
    fs::create_dir_all(session_dir)?;
    let path = session_dir.join(SESSION_DESCRIPTOR);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, descriptor)?;
    writer.flush()?;
    Ok(path)
}

/// Read a `session.json` descriptor
pub fn read_session_descriptor<P: AsRef<Path>>(path: P) -> Result<SessionDescriptor, MetadataError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
