//! Dotted module names to filesystem paths

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use super::CODE_SUFFIX;

/// `a.b.c` -> `a/b/c`
pub fn module_path(module: &str) -> PathBuf {
    module.split('.').collect()
}

/// Whether `module` maps to a path below the package root
pub fn is_package_relative(module: &str) -> bool {
    module_path(module)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Resolves modules inside the checkout's package directory and the destination
#[derive(Debug, Clone)]
pub struct PathResolver {
    source_root: PathBuf,
    dest_root: PathBuf,
}

impl PathResolver {
    pub fn new(checkout: &Path, package: &str, destination: &Path) -> Self {
        Self {
            source_root: checkout.join(package),
            dest_root: destination.to_path_buf(),
        }
    }

    /// The package directory inside the checkout
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    pub fn source(&self, module: &str) -> PathBuf {
        self.source_root.join(module_path(module))
    }

    /// The source path of `module` as a single `.py` file
    pub fn source_file(&self, module: &str) -> PathBuf {
        let mut path = OsString::from(self.source(module));
        path.push(CODE_SUFFIX);
        PathBuf::from(path)
    }

    pub fn dest(&self, module: &str) -> PathBuf {
        self.dest_root.join(module_path(module))
    }
}
