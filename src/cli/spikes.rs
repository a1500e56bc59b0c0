use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use ecephys_tables::joiner::{JoinReport, SpikeJoiner};
use ecephys_tables::writer::TableWriter;

use super::config::Config;

/// Join spike trains with areas and filtered stimuli
pub fn run(
    output: PathBuf,
    data_root: Option<PathBuf>,
    session: Option<i64>,
    only_mapped_areas: bool,
    config: &Config,
) -> Result<()> {
    let data_root = config.data_root(data_root);
    let join = config.join_config(only_mapped_areas);

    info!("Area-filtered spike joiner");
    info!("==========================");
    info!("Input:  {}", data_root.display());
    info!("Output: {}", output.display());
    info!("Stimulus kinds: {}", join.stimulus_kinds.join(", "));
    info!("Reference color: {}", join.reference_color);

    let joiner = SpikeJoiner::new(join, TableWriter::new(config.writer_config(None, None)));
    let report = match session {
        Some(id) => {
            let stats = joiner
                .join_session(&data_root, id, &output)
                .with_context(|| format!("Failed to join session {}", id))?;
            JoinReport {
                joined: vec![stats],
                failed: Vec::new(),
            }
        }
        None => joiner
            .join_all(&data_root, &output)
            .context("Failed to join sessions")?,
    };

    for stats in &report.joined {
        println!("{}", stats);
    }
    for (id, err) in &report.failed {
        println!("session {} failed: {}", id, err);
    }
    println!("{} into {}", report, output.display());

    if !report.is_success() {
        anyhow::bail!("{} of {} sessions failed", report.failed.len(), report.total());
    }
    Ok(())
}
