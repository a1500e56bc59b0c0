use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use ecephys_tables::catalog::CacheDirCatalog;
use ecephys_tables::metadata::{read_index_ids_file, ALL_SESSIONS_CSV};
use ecephys_tables::session::{SessionTransformer, TransformConfig, DEFAULT_COERCE_FIELDS};

use super::config::Config;

/// Options for the sessions command
pub struct SessionsArgs {
    pub cache_dir: Option<PathBuf>,
    pub data_root: Option<PathBuf>,
    pub sessions: Vec<i64>,
    pub overwrite: bool,
    pub clear: bool,
    pub compression_level: Option<i32>,
    pub row_group_size: Option<usize>,
}

/// Transform sessions into per-session tables
pub fn run(args: SessionsArgs, config: &Config) -> Result<()> {
    let cache_dir = config.cache_dir(args.cache_dir);
    let data_root = config.data_root(args.data_root);

    let session_ids = if args.sessions.is_empty() {
        let index = data_root.join(ALL_SESSIONS_CSV);
        read_index_ids_file(&index).with_context(|| {
            format!(
                "Failed to read session list {} (run the metadata command first)",
                index.display()
            )
        })?
    } else {
        args.sessions
    };

    let transform = TransformConfig {
        data_root: data_root.clone(),
        overwrite: args.overwrite,
        clear_cache: args.clear,
        coerce_fields: config
            .transform
            .coerce_fields
            .clone()
            .unwrap_or_else(|| DEFAULT_COERCE_FIELDS.iter().map(|s| s.to_string()).collect()),
        list_narrowing: config.transform.list_narrowing.unwrap_or_default(),
        writer: config.writer_config(args.compression_level, args.row_group_size),
    };

    info!("Session transformer");
    info!("===================");
    info!("Cache:    {}", cache_dir.display());
    info!("Output:   {}", data_root.display());
    info!("Sessions: {}", session_ids.len());
    info!("Coerced fields: {}", transform.coerce_fields.join(", "));
    if transform.overwrite {
        info!("Overwriting existing sessions");
    }
    if transform.clear_cache {
        info!("Clearing cached bundles after each session");
    }

    let catalog = CacheDirCatalog::new(&cache_dir);
    let transformer = SessionTransformer::new(&catalog, transform);
    let report = transformer
        .run_batch(session_ids)
        .with_context(|| format!("Cannot write to {}", data_root.display()))?;

    print!("{}", report.format_colored());

    if !report.is_success() {
        anyhow::bail!("{} of {} sessions failed", report.failed.len(), report.total());
    }
    Ok(())
}
