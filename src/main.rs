// bq-backup - BigQuery daily table export to Cloud Storage
// Copyright (c) 2025 bq-backup Contributors
// Licensed under the MIT License

use bq_backup::cli::Cli;
use bq_backup::config::load_config;
use bq_backup::core::export::ExportCoordinator;
use bq_backup::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    process::exit(exit_code);
}

/// Load configuration and run every export. Dataset failures are reported
/// through notifications and logs; only setup errors reach the caller.
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;

    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let _guard = init_logging(log_level, &config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "bq-backup starting"
    );

    let coordinator = ExportCoordinator::new(config)?;
    let summary = coordinator.run().await;
    summary.log_summary();

    Ok(())
}
