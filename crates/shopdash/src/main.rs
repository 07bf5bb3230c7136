//! Main entry point for shopdash.

use anyhow::{anyhow, Context};
use clap::Parser;
use shopdash::{exit_status, Cli, Dashboard};
use shopdash_common::{init_logging, DashboardError};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            let status = err.downcast_ref::<DashboardError>().map_or(1, exit_status);
            ExitCode::from(status)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, source) = cli.load_config().context("cannot load configuration")?;

    init_logging(config.logging_config()).map_err(|e| anyhow!("failed to initialise logging: {e}"))?;
    info!(version = env!("CARGO_PKG_VERSION"), config = %source, "Starting shopdash");

    let dashboard = Dashboard::new(config);
    let outcome = dashboard
        .run(cli.start, cli.end, !cli.no_charts)
        .await
        .with_context(|| format!("dashboard run over '{}' failed", dashboard.config().dataset.path))?;

    print!("{}", dashboard.summary(&outcome));
    Ok(())
}
