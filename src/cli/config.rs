//! TOML configuration file support.
//!
//! Every setting can also be given on the command line; flags win over the file.
//!
//! ```toml
//! # ecephys.toml
//! [paths]
//! data_root = "data/raw"
//! cache_dir = "cache"
//!
//! [writer]
//! compression_level = 9
//! row_group_size = 500000
//!
//! [transform]
//! coerce_fields = ["spatial_frequency", "phase"]
//! list_narrowing = "first"
//!
//! [joiner]
//! stimulus_kinds = ["flashes", "natural_scenes"]
//! reference_color = 1.0
//! only_mapped_areas = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use ecephys_tables::coerce::ListNarrowing;
use ecephys_tables::joiner::JoinConfig;
use ecephys_tables::writer::{CompressionType, WriterConfig};

const DEFAULT_DATA_ROOT: &str = "data/raw";
const DEFAULT_CACHE_DIR: &str = "cache";

/// Root configuration structure for ecephys.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Parquet settings.
    #[serde(default)]
    pub writer: WriterSection,

    /// Session transformer settings.
    #[serde(default)]
    pub transform: TransformSection,

    /// Spike joiner settings.
    #[serde(default)]
    pub joiner: JoinerSection,
}

/// Input and output locations.
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    /// Root of the per-session output directories.
    pub data_root: Option<PathBuf>,

    /// Local catalog cache.
    pub cache_dir: Option<PathBuf>,
}

/// Parquet settings.
#[derive(Debug, Default, Deserialize)]
pub struct WriterSection {
    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Rows per Parquet row group.
    pub row_group_size: Option<usize>,
}

/// Session transformer settings.
#[derive(Debug, Default, Deserialize)]
pub struct TransformSection {
    /// Stimulus fields holding string-encoded literals.
    pub coerce_fields: Option<Vec<String>>,

    /// What to do with list-valued literals (`first` or `keep`).
    pub list_narrowing: Option<ListNarrowing>,
}

/// Spike joiner settings.
#[derive(Debug, Default, Deserialize)]
pub struct JoinerSection {
    /// Stimulus kinds to keep.
    pub stimulus_kinds: Option<Vec<String>>,

    /// Required color condition.
    pub reference_color: Option<f64>,

    /// Drop units outside the mapped visual areas.
    pub only_mapped_areas: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Data root, flag first.
    pub fn data_root(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.paths.data_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT))
    }

    /// Cache directory, flag first.
    pub fn cache_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.paths.cache_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }

    /// Writer settings with flag overrides applied.
    pub fn writer_config(
        &self,
        compression_level: Option<i32>,
        row_group_size: Option<usize>,
    ) -> WriterConfig {
        let mut config = WriterConfig::default();
        if let Some(level) = compression_level.or(self.writer.compression_level) {
            config.compression = CompressionType::Zstd(level);
        }
        if let Some(size) = row_group_size.or(self.writer.row_group_size) {
            config.row_group_size = size;
        }
        config
    }

    /// Joiner settings with flag overrides applied.
    pub fn join_config(&self, only_mapped_areas: bool) -> JoinConfig {
        let defaults = JoinConfig::default();
        JoinConfig {
            stimulus_kinds: self
                .joiner
                .stimulus_kinds
                .clone()
                .unwrap_or(defaults.stimulus_kinds),
            reference_color: self
                .joiner
                .reference_color
                .unwrap_or(defaults.reference_color),
            only_mapped_areas: only_mapped_areas
                || self.joiner.only_mapped_areas.unwrap_or(false),
        }
    }
}
