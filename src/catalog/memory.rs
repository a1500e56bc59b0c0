use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{CatalogError, CatalogProvider, SessionBundle};
use crate::model::{IndexRecord, SessionDescriptor};

/// In-memory catalog
///
/// Counts bundle fetches, which makes skip behaviour observable.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    sessions: Vec<SessionDescriptor>,
    channels: Vec<IndexRecord>,
    units: Vec<IndexRecord>,
    bundles: RefCell<BTreeMap<i64, SessionBundle>>,
    fetches: Cell<usize>,
}

impl MemoryCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session descriptor
    pub fn with_session(mut self, descriptor: SessionDescriptor) -> Self {
        self.sessions.push(descriptor);
        self
    }

    /// Register a channel index row
    pub fn with_channel(mut self, record: IndexRecord) -> Self {
        self.channels.push(record);
        self
    }

    /// Register a unit index row
    pub fn with_unit(mut self, record: IndexRecord) -> Self {
        self.units.push(record);
        self
    }

    /// Register a raw bundle under its session id
    pub fn with_bundle(self, bundle: SessionBundle) -> Self {
        self.bundles.borrow_mut().insert(bundle.session_id, bundle);
        self
    }

    /// Number of `session_bundle` calls so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    /// True if a bundle is held for the session
    pub fn is_cached(&self, session_id: i64) -> bool {
        self.bundles.borrow().contains_key(&session_id)
    }
}

impl CatalogProvider for MemoryCatalog {
    fn session_index(&self) -> Result<Vec<SessionDescriptor>, CatalogError> {
        Ok(self.sessions.clone())
    }

    fn channel_index(&self) -> Result<Vec<IndexRecord>, CatalogError> {
        Ok(self.channels.clone())
    }

    fn unit_index(&self) -> Result<Vec<IndexRecord>, CatalogError> {
        Ok(self.units.clone())
    }

    fn session_bundle(&self, session_id: i64) -> Result<SessionBundle, CatalogError> {
        self.fetches.set(self.fetches.get() + 1);
        self.bundles
            .borrow()
            .get(&session_id)
            .cloned()
            .ok_or(CatalogError::SessionNotFound(session_id))
    }

    fn clear_session_cache(&self, session_id: i64) -> Result<bool, CatalogError> {
        Ok(self.bundles.borrow_mut().remove(&session_id).is_some())
    }
}
