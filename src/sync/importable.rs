//! Keeps a synced tree importable by adding missing `__init__.py` files

use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::PACKAGE_MARKER;
use crate::error::{Error, Result};

/// Add a package marker to `root`, to every directory between `root` and
/// `target`, and to every directory below `target`. Nothing above `root` is
/// touched. Returns the markers created.
///
/// ```text
/// hooks/                                   (left alone)
/// hooks/charmhelpers/__init__.py           root
/// hooks/charmhelpers/contrib/__init__.py
/// hooks/charmhelpers/contrib/net/__init__.py   target
/// ```
pub fn ensure_importable(root: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    // A target outside root is fixed on its own
    let (base, rel) = match target.strip_prefix(root) {
        Ok(rel) => (root, rel),
        Err(_) => (target, Path::new("")),
    };
    let mut current = base.to_path_buf();
    dirs.push(current.clone());
    for component in rel.components() {
        current.push(component);
        dirs.push(current.clone());
    }

    if target.is_dir() {
        for entry in WalkDir::new(target).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
    }

    let mut created = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let marker = dir.join(PACKAGE_MARKER);
        if !marker.exists() {
            tracing::info!("Adding missing {}: {}", PACKAGE_MARKER, marker.display());
            File::create(&marker).map_err(|e| Error::io(&marker, e))?;
            created.push(marker);
        }
    }
    Ok(created)
}
