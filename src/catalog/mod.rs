//! # Catalog Providers
//!
//! The pipeline pulls everything it processes through [`CatalogProvider`]:
//! dataset-wide indices of sessions, channels and units, plus one raw
//! [`SessionBundle`] per session.
//!
//! Two providers ship with the crate:
//!
//! - [`CacheDirCatalog`]: reads JSON files from a local cache directory
//! - [`MemoryCatalog`]: holds everything in memory and counts bundle fetches

mod bundle;
mod cache_dir;
mod error;
mod memory;

pub use bundle::SessionBundle;
pub use cache_dir::CacheDirCatalog;
pub use error::CatalogError;
pub use memory::MemoryCatalog;

use crate::model::{IndexRecord, SessionDescriptor};

/// Source of session indices and raw session bundles
pub trait CatalogProvider {
    /// All sessions in the dataset
    fn session_index(&self) -> Result<Vec<SessionDescriptor>, CatalogError>;

    /// All recording channels in the dataset
    fn channel_index(&self) -> Result<Vec<IndexRecord>, CatalogError>;

    /// All units in the dataset
    fn unit_index(&self) -> Result<Vec<IndexRecord>, CatalogError>;

    /// Raw multi-modal bundle for one session
    fn session_bundle(&self, session_id: i64) -> Result<SessionBundle, CatalogError>;

    /// Drop the locally cached bundle for a session.
    ///
    /// Returns `false` when nothing was cached.
    fn clear_session_cache(&self, session_id: i64) -> Result<bool, CatalogError>;
}
