use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod metadata;
mod sessions;
mod spikes;

pub use config::Config;

/// ecephys-tables - Per-session Parquet tables from electrophysiology recordings
#[derive(Parser)]
#[command(name = "ecephys-tables")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export dataset indices and per-session descriptors
    Metadata {
        /// Catalog cache directory
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Output root (default: data/raw)
        #[arg(long, value_name = "DIR")]
        data_root: Option<PathBuf>,
    },

    /// Transform sessions into units, running, stimuli and eye-tracking tables
    Sessions {
        /// Catalog cache directory
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Output root (default: data/raw)
        #[arg(long, value_name = "DIR")]
        data_root: Option<PathBuf>,

        /// Session to process (repeatable; default: all sessions in all_sessions.csv)
        #[arg(short, long = "session", value_name = "ID")]
        sessions: Vec<i64>,

        /// Rebuild sessions whose tables already exist
        #[arg(long)]
        overwrite: bool,

        /// Remove each session's cached bundle after its tables are written
        #[arg(long)]
        clear: bool,

        // === Advanced tuning flags (hidden from --help) ===
        /// Compression level for ZSTD (1-22, default: 3)
        #[arg(short = 'c', long, hide = true)]
        compression_level: Option<i32>,

        /// Row group size (rows per row group)
        #[arg(short = 'r', long, hide = true)]
        row_group_size: Option<usize>,
    },

    /// Expand spike trains by area and keep flash / natural-scene onsets
    Spikes {
        /// Output root for the joined tables
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Input root holding ses-<id> directories (default: data/raw)
        #[arg(long, value_name = "DIR")]
        data_root: Option<PathBuf>,

        /// Join only this session (default: every session under the input root)
        #[arg(short, long, value_name = "ID")]
        session: Option<i64>,

        /// Drop units outside the mapped visual areas
        #[arg(long)]
        only_mapped_areas: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Metadata {
            cache_dir,
            data_root,
        } => metadata::run(config.cache_dir(cache_dir), config.data_root(data_root)),
        Commands::Sessions {
            cache_dir,
            data_root,
            sessions: ids,
            overwrite,
            clear,
            compression_level,
            row_group_size,
        } => sessions::run(
            sessions::SessionsArgs {
                cache_dir,
                data_root,
                sessions: ids,
                overwrite,
                clear,
                compression_level,
                row_group_size,
            },
            &config,
        ),
        Commands::Spikes {
            output,
            data_root,
            session,
            only_mapped_areas,
        } => spikes::run(output, data_root, session, only_mapped_areas, &config),
    }
}
