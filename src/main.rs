//! # ecephys-tables
//!
//! Command-line front end for the session table pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Dataset indices and session descriptors
//! ecephys-tables metadata --cache-dir cache --data-root data/raw
//!
//! # Per-session tables (skips sessions already written)
//! ecephys-tables -v sessions --cache-dir cache --clear
//!
//! # Spike events by area plus flash / natural-scene onsets
//! ecephys-tables spikes data/processed
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
