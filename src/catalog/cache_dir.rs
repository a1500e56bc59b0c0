use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use super::{CatalogError, CatalogProvider, SessionBundle};
use crate::model::{IndexRecord, SessionDescriptor};

/// File holding the session index
pub const SESSIONS_FILE: &str = "sessions.json";
/// File holding the channel index
pub const CHANNELS_FILE: &str = "channels.json";
/// File holding the unit index
pub const UNITS_FILE: &str = "units.json";

/// Catalog backed by a local cache directory
///
/// ```text
/// cache/
/// ├── sessions.json
/// ├── channels.json
/// ├── units.json
/// └── session_<id>/session_<id>.json
/// ```
#[derive(Debug, Clone)]
pub struct CacheDirCatalog {
    root: PathBuf,
}

impl CacheDirCatalog {
    /// Open a cache directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a session's cached bundle
    pub fn bundle_path(&self, session_id: i64) -> PathBuf {
        self.root
            .join(format!("session_{}", session_id))
            .join(format!("session_{}.json", session_id))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, CatalogError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::NotFound(path.display().to_string()),
            _ => CatalogError::IoError(e),
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl CatalogProvider for CacheDirCatalog {
    fn session_index(&self) -> Result<Vec<SessionDescriptor>, CatalogError> {
        self.read_json(&self.root.join(SESSIONS_FILE))
    }

    fn channel_index(&self) -> Result<Vec<IndexRecord>, CatalogError> {
        self.read_json(&self.root.join(CHANNELS_FILE))
    }

    fn unit_index(&self) -> Result<Vec<IndexRecord>, CatalogError> {
        self.read_json(&self.root.join(UNITS_FILE))
    }

    fn session_bundle(&self, session_id: i64) -> Result<SessionBundle, CatalogError> {
        let path = self.bundle_path(session_id);
        if !path.exists() {
            return Err(CatalogError::SessionNotFound(session_id));
        }
        debug!("Reading bundle {}", path.display());
        let mut bundle: SessionBundle = self.read_json(&path)?;
        bundle.session_id = session_id;
        Ok(bundle)
    }

    fn clear_session_cache(&self, session_id: i64) -> Result<bool, CatalogError> {
        match fs::remove_file(self.bundle_path(session_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUNDLE: &str = r#"{
        "session_id": 0,
        "units": [{"unit_id": 11, "ecephys_structure_acronym": "VISp", "snr": 2.5}],
        "spike_times": {"11": [0.5, 1.5]},
        "mean_waveforms": {
            "11": {"time": [0.0, 0.5, null], "channels": [{"channel_id": 3, "data": [1.0, -1.0, 0.0]}]}
        },
        "running_speed": {"timestamps": [0.0, 1.0], "columns": [{"name": "velocity", "values": [0.1, null]}]},
        "stimuli": [
            {"stimulus_presentation_id": 0, "start_time": 1.0, "stop_time": 1.25,
             "stimulus_name": "flashes", "color": 1.0, "phase": "null"}
        ]
    }"#;

    #[test]
    fn test_read_bundle() {
        let dir = tempdir().unwrap();
        let catalog = CacheDirCatalog::new(dir.path());
        let path = catalog.bundle_path(42);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, BUNDLE).unwrap();

        let bundle = catalog.session_bundle(42).unwrap();
        assert_eq!(bundle.session_id, 42);
        assert_eq!(bundle.units[0].unit_id, 11);
        assert_eq!(bundle.spike_times[&11], vec![0.5, 1.5]);
        assert_eq!(bundle.mean_waveforms[&11].time[2], None);
        assert_eq!(bundle.running_speed.columns[0].values[1], None);
        assert!(bundle.pupil.is_none());
        assert_eq!(bundle.stimuli[0].kind(), Some("flashes"));
        assert_eq!(
            bundle.stimuli[0].attributes.get("phase"),
            Some(&crate::value::Value::from("null"))
        );

        assert!(catalog.clear_session_cache(42).unwrap());
        assert!(!catalog.clear_session_cache(42).unwrap());
        assert!(matches!(
            catalog.session_bundle(42),
            Err(CatalogError::SessionNotFound(42))
        ));
    }

    #[test]
    fn test_read_session_index() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SESSIONS_FILE),
            r#"[{"id": 715093703, "specimen_id": 7, "session_type": "brain_observatory_1.1"}]"#,
        )
        .unwrap();
        let catalog = CacheDirCatalog::new(dir.path());
        let sessions = catalog.session_index().unwrap();
        assert_eq!(sessions[0].session_id, 715093703);
        assert_eq!(sessions[0].attributes.len(), 2);
        assert!(matches!(catalog.unit_index(), Err(CatalogError::NotFound(_))));
    }
}
