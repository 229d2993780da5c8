//! Configuration loading for charm-helpers-sync
//!
//! Settings come from three layers, lowest priority first:
//!
//! 1. the YAML file passed with `--config`
//! 2. `CHARM_HELPERS_SYNC_*` environment variables (scalar keys only)
//! 3. command-line flags
//!
//! The merged [`RawConfig`] is validated into an immutable [`SyncConfig`].

mod include;

pub use include::{IncludeEntry, IncludeSpec, ModuleSpec, parse_options};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Error, Result};
use crate::vcs::Backend;

/// Upstream used when no repository is configured anywhere
pub const CHARM_HELPERS_REPO: &str = "https://github.com/juju/charm-helpers";

/// Top-level package directory inside the upstream checkout
pub const DEFAULT_PACKAGE: &str = "charmhelpers";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CHARM_HELPERS_SYNC_";

const ENV_KEYS: &[&str] = &["repo", "branch", "destination", "options", "vcs", "package"];

/// Configuration as merged from all layers, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub repo: Option<String>,
    /// Older configs name the locator `branch`
    pub branch: Option<String>,
    pub destination: Option<PathBuf>,
    pub include: Option<Vec<IncludeEntry>>,
    pub options: Option<String>,
    pub vcs: Option<Backend>,
    pub package: Option<String>,
}

/// Values supplied on the command line; unset fields leave lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs: Option<Backend>,
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncConfig {
    pub repo: String,
    pub destination: PathBuf,
    pub include: Vec<IncludeSpec>,
    pub options: Vec<String>,
    pub vcs: Backend,
    pub package: String,
}

impl RawConfig {
    /// Merge the config file, environment and CLI overrides
    pub fn load(config_file: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            tracing::info!("Loading charm helper config from {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS))
            .merge(Serialized::defaults(overrides));

        figment.extract().map_err(|source| {
            ConfigError::Parse {
                path: config_file.map(Path::to_path_buf).unwrap_or_default(),
                source: Box::new(source),
            }
            .into()
        })
    }

    /// Validate into a [`SyncConfig`], falling back to positional `modules`
    /// when the config carries no include list
    pub fn resolve(self, modules: &[String]) -> Result<SyncConfig> {
        let destination = self.destination.ok_or(Error::MissingDestination)?;

        let entries = match self.include {
            Some(include) if !include.is_empty() => include,
            _ => modules.iter().cloned().map(IncludeEntry::Module).collect(),
        };
        if entries.is_empty() {
            return Err(Error::MissingModules);
        }

        Ok(SyncConfig {
            repo: self
                .repo
                .or(self.branch)
                .unwrap_or_else(|| CHARM_HELPERS_REPO.to_string()),
            destination,
            include: entries.into_iter().flat_map(IncludeSpec::from_entry).collect(),
            options: self.options.as_deref().map(parse_options).unwrap_or_default(),
            vcs: self.vcs.unwrap_or_default(),
            package: self.package.unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
        })
    }
}

impl SyncConfig {
    /// Load and validate in one step
    pub fn load(
        config_file: Option<&Path>,
        overrides: &CliOverrides,
        modules: &[String],
    ) -> Result<Self> {
        RawConfig::load(config_file, overrides)?.resolve(modules)
    }

    /// Render as YAML, in the same shape the config file uses
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }
}
