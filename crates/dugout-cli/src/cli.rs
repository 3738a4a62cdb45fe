//! CLI argument definitions for dugout.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | `config.yml` | YAML run configuration |
//! | `--skip` | none | Steps to leave out |
//! | `--only` | all | Steps to run, in registry order |
//!
//! # Examples
//!
//! ```bash
//! # Full extraction
//! dugout
//!
//! # Re-run the stat steps after a failure
//! dugout --only batting_stats pitching_stats
//!
//! # Everything except the pitch-level pull
//! dugout --config season-2024.yml --skip statcast
//! ```

use std::path::PathBuf;

use clap::Parser;
use dugout_core::{StepName, DEFAULT_CONFIG_PATH};

/// Extract MLB Stats API and Statcast data into a local DuckDB warehouse.
#[derive(Debug, Parser)]
#[command(
    name = "dugout",
    author,
    version,
    about = "MLB raw data extraction into DuckDB",
    long_about = "Runs the extraction steps in dependency order:\n\
\n\
  teams, players, schedule, games, batting_stats, pitching_stats, statcast\n\
\n\
A failing step is reported and the run continues. The exit status is 0 when \
every selected step succeeded and 1 otherwise."
)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Steps to skip. Applied after --only.
    #[arg(long, value_name = "STEP", num_args = 1..)]
    pub skip: Vec<StepName>,

    /// Run only these steps.
    #[arg(long, value_name = "STEP", num_args = 1..)]
    pub only: Vec<StepName>,
}
