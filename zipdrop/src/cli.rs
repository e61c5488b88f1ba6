///
/// This module implements the CLI interface for zipdrop: command parsing, config
/// assembly and the async entrypoint used by both `main()` and the integration tests.
///
/// All pipeline logic (discovery, archiving, size gate, orchestration) lives in
/// the [`zipdrop-core`] crate. This module only wires concrete collaborators into
/// [`zipdrop_core::batch::run_batch`].
///
/// [`zipdrop-core`]: ../../zipdrop-core/
use crate::load_config::{install_base, load_config};
use crate::upload::FileHostClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zipdrop_core::archive::ZipArchiver;
use zipdrop_core::batch::{run_batch, BatchReport};
use zipdrop_core::reporter::TracingReporter;

/// CLI for zipdrop: zip every folder under a source directory and upload it.
#[derive(Parser)]
#[clap(
    name = "zipdrop",
    version,
    about = "Zip every folder under a source directory and upload each archive to a file host"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive and upload every folder under the first existing source root
    Run {
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Source root candidate, tried in the order given; replaces configured roots
        #[clap(long = "source")]
        sources: Vec<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
///
/// Item failures are part of the returned report; only config errors and an
/// unreadable source root come back as `Err`.
pub async fn run(cli: Cli) -> Result<BatchReport> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run { config, sources } => {
            let base = install_base()?;
            let config = load_config(config.as_deref(), &sources, &base)?;
            tracing::info!(command = "run", "Starting batch upload");
            let uploader = FileHostClient::new(&config.upload)?;

            let report = run_batch(&config.batch, &ZipArchiver, &uploader, &TracingReporter)
                .await
                .context("batch run aborted")?;
            tracing::info!(
                command = "run",
                uploaded = report.uploaded(),
                unresolved = report.unresolved(),
                skipped = report.skipped(),
                failed = report.failed(),
                "Batch upload complete"
            );
            Ok(report)
        }
    }
}
