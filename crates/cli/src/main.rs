//! splunk-export - export Splunk search results to local files and object storage.
//!
//! Responsibilities:
//! - Parse command-line arguments and build the validated configuration.
//! - Initialize logging (stderr) and the optional Prometheus exporter.
//! - Run one export, print its summary JSON on stdout and exit with a
//!   structured code.
//!
//! Does NOT handle:
//! - Resolution, search execution or writing (see `crates/export`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Only the run summary is written to stdout.

mod args;
mod error;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use error::{ExitCode, ExitCodeExt};
use splunk_export::{CancellationToken, ExportOrchestrator, MetricsExporter};
use splunk_export_config::{Config, ConfigLoader, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigurationError.as_i32());
    }

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    };

    init_logging(&config);

    let _metrics_exporter = match config.telemetry.metrics_bind.as_deref() {
        Some(bind_addr) => match MetricsExporter::install(bind_addr) {
            Ok(exporter) => Some(exporter),
            Err(e) => {
                eprintln!("Failed to start metrics exporter: {}", e);
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        },
        None => None,
    };

    // Create cancellation token and set up signal handling
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        tracing::warn!("Interrupt received, finishing in-flight writes");
        cancel_clone.cancel();
    });

    let exit_code = match run(&config, cancel).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config_path() {
        loader = loader.with_config_path(path);
    }
    let loader = loader
        .from_file()
        .context("Failed to read configuration file")?
        .from_env()
        .context("Failed to load configuration from environment")?;
    let config = cli
        .apply(loader)
        .build()
        .context("Failed to build configuration")?;
    Ok(config)
}

fn init_logging(config: &Config) {
    let default_level = if config.debug_mode { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match config.telemetry.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(config: &Config, cancel: CancellationToken) -> anyhow::Result<ExitCode> {
    let orchestrator = ExportOrchestrator::from_config(config, cancel)?;
    let summary = orchestrator.run(config).await?;

    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    println!("{}", json);

    if let Some(error) = &summary.error {
        eprintln!("Export aborted: {}", error);
    }
    Ok(ExitCode::from(&summary))
}
