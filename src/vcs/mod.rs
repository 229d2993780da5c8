//! Version-control backends
//!
//! The upstream library is obtained by shelling out to a VCS client. Each client
//! is a [`VcsBackend`]; [`Backend`] selects one from config or the command line.

mod bzr;
mod git;

pub use bzr::BzrBackend;
pub use git::{GitBackend, RepoLocator};

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FetchError;

/// Directory name of the checkout inside the scratch workspace
pub const CHECKOUT_DIR: &str = "charm-helpers";

/// Which VCS client fetches the upstream repository
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Git,
    Bzr,
}

impl Backend {
    pub fn client(self) -> Box<dyn VcsBackend> {
        match self {
            Backend::Git => Box::new(GitBackend),
            Backend::Bzr => Box::new(BzrBackend),
        }
    }
}

/// A local checkout produced by a backend
#[derive(Debug, Clone)]
pub struct Checkout {
    pub path: PathBuf,
    /// Commit id of the checkout, when the backend can tell
    pub revision: Option<String>,
}

/// A VCS client able to produce a shallow checkout
pub trait VcsBackend {
    /// Client binary name, e.g. `git`
    fn program(&self) -> &'static str;

    /// Arguments for checking out `locator` into `dest`
    fn checkout_args(&self, locator: &str, dest: &Path) -> Vec<OsString>;

    /// Revision of a finished checkout
    fn revision(&self, _checkout: &Path) -> Option<String> {
        None
    }
}

/// Check out `locator` into `<scratch>/charm-helpers`
pub fn fetch(
    backend: &dyn VcsBackend,
    scratch: &Path,
    locator: &str,
) -> Result<Checkout, FetchError> {
    let dest = scratch.join(CHECKOUT_DIR);
    tracing::info!("Cloning out {} to {}", locator, dest.display());

    let program = which::which(backend.program()).map_err(|source| FetchError::ClientNotFound {
        client: backend.program(),
        source,
    })?;
    let args = backend.checkout_args(locator, &dest);
    let command = render_command(backend.program(), &args);
    tracing::debug!("Running {}", command);

    let output = Command::new(program)
        .args(&args)
        .output()
        .map_err(|source| FetchError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(FetchError::Failed {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let revision = backend.revision(&dest);
    match &revision {
        Some(rev) => tracing::info!("Checked out {} at {}", locator, rev),
        None => tracing::debug!("Checked out {}", locator),
    }

    Ok(Checkout {
        path: dest,
        revision,
    })
}

fn render_command(program: &str, args: &[OsString]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|arg| arg.to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}
