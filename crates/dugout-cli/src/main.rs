mod cli;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use dugout_core::{
    registry, Config, HttpPitchSource, HttpStatsApi, Orchestrator, ReqwestHttpClient, RunPlan,
    StepContext, ThreadSleeper, Warehouse, WarehouseConfig,
};
use uuid::Uuid;

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let dispatch = logging::dispatch(&config.logging)?;

    tracing::dispatcher::with_default(&dispatch, || extract(&cli, &config))
}

fn extract(cli: &Cli, config: &Config) -> Result<ExitCode, CliError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);
    let _entered = span.enter();

    tracing::info!(
        config = %cli.config.display(),
        season = config.extraction.season,
        "extraction started"
    );
    for key in config.database.ignored_keys() {
        tracing::warn!(key, "database setting is ignored by the embedded warehouse");
    }

    let warehouse = Warehouse::open(WarehouseConfig::file(config.database.db_path()))?;
    let client = ReqwestHttpClient::new()?;
    let stats = HttpStatsApi::new(
        client.clone(),
        config.api.stats_base_url.as_str(),
        config.api.timeout_ms,
    );
    let pitches = HttpPitchSource::new(
        client,
        config.api.statcast_base_url.as_str(),
        config.api.timeout_ms,
    );
    let sleeper = ThreadSleeper;
    let context = StepContext::new(config, &stats, &pitches, &warehouse, &sleeper);

    let plan = RunPlan::build(registry(), &cli.only, &cli.skip);
    tracing::info!(steps = plan.len(), "run plan built");
    let summary = Orchestrator::new(plan).run(&context);

    Ok(ExitCode::from(summary.exit_code()))
}
