//! Error types for charm-helpers-sync

use std::path::PathBuf;
use std::process::ExitStatus;

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for a sync run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No destination given as option, environment or config
    #[error("No destination dir. specified as option or config")]
    MissingDestination,

    /// No modules given in config or as arguments
    #[error("No modules to sync specified as option or config")]
    MissingModules,

    /// The version-control client failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The checkout does not contain the helper package
    #[error("Package directory not found in checkout: {path}")]
    PackageNotFound { path: PathBuf },

    /// An `inc=` pattern is not a valid glob
    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed during a copy or marker walk
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// The resolved configuration could not be rendered
    #[error("Could not render configuration: {0}")]
    Render(#[from] serde_yml::Error),

    /// The scratch workspace could not be created
    #[error("Could not create scratch workspace: {0}")]
    Scratch(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from user input rather than the sync itself
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingDestination | Self::MissingModules
        )
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_input_error() { 1 } else { 2 }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config file: {path}")]
    NotFound { path: PathBuf },

    #[error("Could not parse config from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
}

/// Version-control client errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("'{client}' not found on PATH")]
    ClientNotFound {
        client: &'static str,
        #[source]
        source: which::Error,
    },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}
