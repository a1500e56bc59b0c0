use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use ecephys_tables::catalog::CacheDirCatalog;
use ecephys_tables::metadata::export_dataset_metadata;

/// Write the dataset indices and per-session descriptors
pub fn run(cache_dir: PathBuf, data_root: PathBuf) -> Result<()> {
    info!("Dataset metadata export");
    info!("=======================");
    info!("Cache:  {}", cache_dir.display());
    info!("Output: {}", data_root.display());

    let catalog = CacheDirCatalog::new(&cache_dir);
    let stats = export_dataset_metadata(&catalog, &data_root)
        .context("Failed to export dataset metadata")?;

    println!(
        "Exported {} sessions, {} channels, {} units to {}",
        stats.sessions,
        stats.channels,
        stats.units,
        data_root.display()
    );
    Ok(())
}
