//! Shared entry point of the `wdl-ingest` binaries
//!
//! Every binary installs logging, builds the configuration from the
//! environment, wires the Cognite source and the Well Data Layer clients to a
//! single token provider and runs one or more stages on a current-thread
//! runtime.

pub mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wdl_ingest_core::config::MappingConfig;
use wdl_ingest_core::{
    CdfSourceClient, IngestConfig, RecordingWellDataLayer, RunSummary, Stage, StageContext,
    TokenProvider, WdlClient, WellDataLayer, run_stages,
};

pub use error::CliError;

/// Overrides applied on top of the environment configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Mapping table file, takes precedence over `WDL_INGEST_MAPPING`
    pub mapping: Option<PathBuf>,
    /// Force dry-run mode
    pub dry_run: bool,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

/// Install the tracing subscriber (`RUST_LOG` overrides the `info` default)
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read the configuration from the environment and apply `options`
pub fn load_config(options: &RunOptions) -> Result<IngestConfig, CliError> {
    let mut config = IngestConfig::from_env()?;
    if let Some(path) = &options.mapping {
        config.mapping = MappingConfig::from_file(path)?;
    }
    if options.dry_run {
        config.dry_run = true;
    }
    Ok(config)
}

/// Run `stages` in order against the configured project
pub async fn execute(stages: &[Stage], options: &RunOptions) -> Result<Vec<RunSummary>, CliError> {
    let config = load_config(options)?;
    info!(
        project = %config.credentials.project,
        dry_run = config.dry_run,
        stages = stages.len(),
        "Starting ingestion"
    );

    let tokens = Arc::new(TokenProvider::new(config.credentials.auth.clone()));
    let source = CdfSourceClient::new(&config.credentials, tokens.clone(), config.max_retries);
    let wdl: Arc<dyn WellDataLayer> = Arc::new(WdlClient::new(&config, tokens));
    let destination: Arc<dyn WellDataLayer> = if config.dry_run {
        warn!("Dry run: writes are recorded locally and not sent to the Well Data Layer");
        Arc::new(RecordingWellDataLayer::reading_from(wdl))
    } else {
        wdl
    };

    let ctx = StageContext::new(&config, &source, destination.as_ref())
        .with_progress(options.progress);
    Ok(run_stages(stages, &ctx).await?)
}

/// Run `stages` to completion and map the outcome to an exit code
///
/// Per-record skips and failures still exit with success; only fatal errors
/// do not. Ctrl-C stops the run and exits with success.
pub fn run_cli(stages: &[Stage], options: RunOptions) -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let code = runtime.block_on(async {
        tokio::select! {
            result = execute(stages, &options) => report(result),
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping");
                ExitCode::SUCCESS
            }
        }
    });
    Ok(code)
}

fn report(result: Result<Vec<RunSummary>, CliError>) -> ExitCode {
    match result {
        Ok(summaries) => {
            for summary in &summaries {
                println!("{summary}");
            }
            if summaries.len() > 1 {
                let mut total = RunSummary::new("all");
                for summary in summaries {
                    total.merge(summary);
                }
                println!("{total}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Ingestion aborted");
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
