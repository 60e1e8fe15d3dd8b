//! Neuron Features - Main Entry Point

use anyhow::Result;
use clap::Parser;
use neuron_features_cli::{init_logging, run, Cli, Settings};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(settings.level(cli.verbose)?, settings.log_format)?;

    info!("=== Neuron Features v{} ===", env!("CARGO_PKG_VERSION"));
    let output = run(&cli, &settings)?;
    print!("{}", output);

    Ok(())
}
