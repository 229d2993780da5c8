//! Command-line interface and run orchestration
//!
//! A run loads the configuration, clones the upstream repository into a scratch
//! workspace, syncs the requested modules and removes the workspace again,
//! whether or not the sync succeeded.

mod output;

pub use output::Output;

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{CliOverrides, SyncConfig};
use crate::error::{Error, Result};
use crate::sync::{SyncEngine, SyncReport};
use crate::vcs::{self, Backend};

const SCRATCH_PREFIX: &str = "charm-helpers-sync-";

/// Sync charm-helpers modules into a charm
#[derive(Parser, Debug)]
#[command(name = "charm-helpers-sync", author, version, about, long_about = None)]
pub struct Cli {
    /// Helper config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Helpers repository, optionally suffixed with @<ref> (overrides config)
    #[arg(
        short = 'r',
        long = "repository",
        value_name = "LOCATOR",
        visible_short_alias = 'b',
        visible_alias = "branch"
    )]
    pub repository: Option<String>,

    /// Sync destination dir (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Version-control client used to fetch the repository (overrides config)
    #[arg(long, value_enum)]
    pub vcs: Option<Backend>,

    /// Print the resolved configuration as YAML and exit without syncing
    #[arg(long)]
    pub print_config: bool,

    /// Modules to sync when the config has no include list
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            repo: self.repository.clone(),
            destination: self.destination.clone(),
            vcs: self.vcs,
        }
    }

    /// Load the configuration and run the sync
    pub fn run(self) -> Result<()> {
        let output = Output::new(self.debug);
        let config = SyncConfig::load(self.config.as_deref(), &self.overrides(), &self.modules)?;

        if self.print_config {
            print!("{}", config.to_yaml()?);
            return Ok(());
        }

        let report = sync_repository(&config)?;
        output.report(&report, &config.destination.display().to_string());
        Ok(())
    }
}

/// Fetch `config.repo` into a scratch workspace and sync from it. The
/// workspace is removed on every return path.
pub fn sync_repository(config: &SyncConfig) -> Result<SyncReport> {
    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .map_err(Error::Scratch)?;

    let result = sync_from(config, scratch.path());

    tracing::debug!("Cleaning up {}", scratch.path().display());
    if let Err(e) = scratch.close() {
        tracing::warn!("Could not remove scratch workspace: {}", e);
    }
    result
}

fn sync_from(config: &SyncConfig, scratch: &Path) -> Result<SyncReport> {
    let backend = config.vcs.client();
    let checkout = vcs::fetch(backend.as_ref(), scratch, &config.repo)?;

    let mut report = SyncEngine::new(&checkout.path, &config.package, &config.destination)
        .sync_all(&config.include, &config.options)?;
    report.revision = checkout.revision;
    Ok(report)
}

/// Build the subscriber for a run. `RUST_LOG` takes precedence over `--debug`.
pub fn logging_subscriber(debug: bool) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug,globset=warn")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
}
