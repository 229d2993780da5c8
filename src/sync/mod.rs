//! Sync engine
//!
//! Copies requested modules from a checkout of the helper library into the
//! destination tree. A module is either a package directory, copied with
//! [`IncludeFilter`] applied, or a single `.py` file. Either way the package
//! markers on the path to it are synced first so the result stays importable.

mod filter;
mod importable;
mod paths;

pub use filter::IncludeFilter;
pub use importable::ensure_importable;
pub use paths::{PathResolver, is_package_relative, module_path};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::IncludeSpec;
use crate::error::{Error, Result};

/// Marker file that makes a directory an importable package
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Suffix of code files, which are never filtered out
pub const CODE_SUFFIX: &str = ".py";

/// What happens to an existing destination before a batch sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestinationMode {
    /// Delete and recreate, so every run starts clean
    #[default]
    Replace,
    /// Create if missing, keep existing content
    Preserve,
}

/// How a module exists in the source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Package,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedModule {
    pub module: String,
    pub kind: ModuleKind,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a package directory nor a `.py` file
    Missing,
    /// The name resolves to a path outside the package
    OutsidePackage,
}

/// A requested module that was not synced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWarning {
    pub module: String,
    pub source: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::Missing => write!(
                f,
                "Could not sync: {}. Neither a pyfile or directory at {}",
                self.module,
                self.source.display()
            ),
            SkipReason::OutsidePackage => write!(
                f,
                "Could not sync: {}. Not a module path inside the package",
                self.module
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    Synced(SyncedModule),
    Skipped(SyncWarning),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: Vec<SyncedModule>,
    pub skipped: Vec<SyncWarning>,
    /// Upstream revision the modules were taken from
    pub revision: Option<String>,
}

impl SyncReport {
    fn record(&mut self, outcome: ModuleOutcome) {
        match outcome {
            ModuleOutcome::Synced(module) => self.synced.push(module),
            ModuleOutcome::Skipped(warning) => self.skipped.push(warning),
        }
    }
}

pub struct SyncEngine {
    paths: PathResolver,
    mode: DestinationMode,
}

impl SyncEngine {
    /// Engine syncing from `<checkout>/<package>` into `destination`
    pub fn new(checkout: &Path, package: &str, destination: &Path) -> Self {
        Self {
            paths: PathResolver::new(checkout, package, destination),
            mode: DestinationMode::default(),
        }
    }

    pub fn with_destination_mode(mut self, mode: DestinationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sync every include-spec. Per-spec options are placed before `global_options`.
    pub fn sync_all(
        &self,
        include: &[IncludeSpec],
        global_options: &[String],
    ) -> Result<SyncReport> {
        let source_root = self.paths.source_root();
        if !source_root.is_dir() {
            return Err(Error::PackageNotFound {
                path: source_root.to_path_buf(),
            });
        }
        self.prepare_destination()?;

        let mut report = SyncReport::default();
        for spec in include {
            for module in spec.modules() {
                let options = module.effective_options(global_options);
                report.record(self.sync_module(&module.name, &options)?);
            }
        }
        Ok(report)
    }

    /// Sync one dotted module together with the markers leading to it
    pub fn sync_module(&self, module: &str, options: &[String]) -> Result<ModuleOutcome> {
        let source = self.paths.source(module);
        if !is_package_relative(module) {
            let warning = SyncWarning {
                module: module.to_string(),
                source,
                reason: SkipReason::OutsidePackage,
            };
            tracing::warn!("{}", warning);
            return Ok(ModuleOutcome::Skipped(warning));
        }

        let kind = if source.is_dir() {
            ModuleKind::Package
        } else if self.paths.source_file(module).is_file() {
            ModuleKind::File
        } else {
            let warning = SyncWarning {
                module: module.to_string(),
                source,
                reason: SkipReason::Missing,
            };
            tracing::warn!("{}, does it even exist?", warning);
            return Ok(ModuleOutcome::Skipped(warning));
        };

        // Bootstrap code lives in the package root marker
        self.sync_marker(self.paths.source_root(), self.paths.dest_root())?;

        let steps: Vec<&str> = module.split('.').collect();
        for depth in 1..steps.len() {
            let prefix = steps[..depth].join(".");
            self.sync_marker(&self.paths.source(&prefix), &self.paths.dest(&prefix))?;
        }

        let dest = match kind {
            ModuleKind::Package => {
                let dest = self.paths.dest(module);
                self.sync_directory(&source, &dest, &IncludeFilter::from_options(options)?)?;
                dest
            }
            ModuleKind::File => {
                let dest_dir = self.paths.dest(module);
                let dest_dir = dest_dir.parent().unwrap_or(self.paths.dest_root());
                self.sync_file(&self.paths.source_file(module), dest_dir)?
            }
        };

        Ok(ModuleOutcome::Synced(SyncedModule {
            module: module.to_string(),
            kind,
            dest,
        }))
    }

    fn prepare_destination(&self) -> Result<()> {
        let dest = self.paths.dest_root();
        if self.mode == DestinationMode::Replace && dest.exists() {
            tracing::debug!("Removing existing directory: {}", dest.display());
            fs::remove_dir_all(dest).map_err(|e| Error::io(dest, e))?;
        }
        fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))
    }

    /// Copy `src_dir`'s package marker into `dest_dir`, when the source
    /// directory exists
    fn sync_marker(&self, src_dir: &Path, dest_dir: &Path) -> Result<()> {
        if !src_dir.is_dir() {
            tracing::debug!("No source package at {}, not syncing marker", src_dir.display());
            return Ok(());
        }
        fs::create_dir_all(dest_dir).map_err(|e| Error::io(dest_dir, e))?;

        let marker = src_dir.join(PACKAGE_MARKER);
        if marker.is_file() {
            let target = dest_dir.join(PACKAGE_MARKER);
            tracing::debug!("Syncing marker: {} -> {}", marker.display(), target.display());
            fs::copy(&marker, &target).map_err(|e| Error::io(&target, e))?;
        }
        ensure_importable(self.paths.dest_root(), dest_dir)?;
        Ok(())
    }

    /// Copy a single `.py` file (and its directory's marker) into `dest_dir`
    fn sync_file(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf> {
        tracing::info!("Syncing pyfile: {} -> {}", src.display(), dest_dir.display());
        fs::create_dir_all(dest_dir).map_err(|e| Error::io(dest_dir, e))?;

        let target = match src.file_name() {
            Some(name) => dest_dir.join(name),
            None => return Err(Error::io(src, std::io::ErrorKind::InvalidInput.into())),
        };
        fs::copy(src, &target).map_err(|e| Error::io(&target, e))?;

        if let Some(marker) = src.parent().map(|dir| dir.join(PACKAGE_MARKER)) {
            if marker.is_file() {
                let marker_target = dest_dir.join(PACKAGE_MARKER);
                fs::copy(&marker, &marker_target).map_err(|e| Error::io(&marker_target, e))?;
            }
        }
        ensure_importable(self.paths.dest_root(), dest_dir)?;
        Ok(target)
    }

    /// Replace `dest` with a filtered copy of `src`
    fn sync_directory(&self, src: &Path, dest: &Path, filter: &IncludeFilter) -> Result<()> {
        if dest.is_dir() {
            tracing::debug!("Removing existing directory: {}", dest.display());
            fs::remove_dir_all(dest).map_err(|e| Error::io(dest, e))?;
        } else if dest.exists() {
            fs::remove_file(dest).map_err(|e| Error::io(dest, e))?;
        }
        tracing::info!("Syncing directory: {} -> {}", src.display(), dest.display());

        let walker = WalkDir::new(src)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || filter.admits(entry.path(), entry.file_type())
            });

        for entry in walker {
            let entry = entry?;
            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dest.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            } else if file_type.is_file() {
                fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            } else {
                tracing::debug!("Not syncing special file: {}", entry.path().display());
            }
        }

        ensure_importable(self.paths.dest_root(), dest)?;
        Ok(())
    }
}
