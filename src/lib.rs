//! # charm-helpers-sync
//!
//! Sync a filtered subset of the [charm-helpers](https://github.com/juju/charm-helpers)
//! library into a charm's source tree.
//!
//! A YAML file names the upstream repository, the destination and the modules
//! to take:
//!
//! ```yaml
//! repo: https://github.com/juju/charm-helpers@master
//! destination: hooks/charmhelpers
//! include:
//!   - core
//!   - fetch
//!   - contrib.openstack|inc=*
//!   - contrib.storage:
//!       - linux
//! ```
//!
//! ```bash
//! charm-helpers-sync -c charm-helpers-hooks.yaml
//! ```
//!
//! The repository is shallow-cloned into a scratch directory that is removed
//! when the run ends. Each module is copied either as a package directory or a
//! single `.py` file, every directory on the way gets an `__init__.py`, and
//! non-code files are dropped unless an `inc=<glob>` option keeps them.

pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
pub mod vcs;

pub use cli::Cli;
pub use config::SyncConfig;
pub use error::{Error, Result};
pub use sync::{SyncEngine, SyncReport};

