//! Entry filter for directory syncs
//!
//! Code files always survive. Other files survive only when an `inc=<glob>`
//! option matches their full source path. Directories survive only when they
//! are packages themselves. `inc=*` turns filtering off.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs::FileType;
use std::path::Path;

use super::{CODE_SUFFIX, PACKAGE_MARKER};
use crate::error::{Error, Result};

const INCLUDE_PREFIX: &str = "inc=";
const INCLUDE_ALL: &str = "inc=*";

#[derive(Debug, Clone)]
pub enum IncludeFilter {
    /// `inc=*`: copy everything
    Everything,
    /// Keep code files and packages, plus non-code files matching `globs`
    Packages { globs: Option<GlobSet>, patterns: Vec<String> },
}

impl IncludeFilter {
    /// Build from options like `["inc=*.j2", "inc=*.conf"]`
    pub fn from_options(options: &[String]) -> Result<Self> {
        if options.iter().any(|opt| opt == INCLUDE_ALL) {
            return Ok(Self::Everything);
        }

        let mut patterns = Vec::new();
        for option in options {
            match option.strip_prefix(INCLUDE_PREFIX) {
                Some(pattern) if !pattern.is_empty() => patterns.push(pattern.to_string()),
                _ => tracing::warn!("Ignoring unknown sync option: {}", option),
            }
        }

        Ok(Self::Packages {
            globs: build_globset(&patterns)?,
            patterns,
        })
    }

    /// Whether entry `path` of kind `file_type` is copied
    pub fn admits(&self, path: &Path, file_type: FileType) -> bool {
        let Self::Packages { globs, patterns } = self else {
            return true;
        };
        let is_code = path.to_string_lossy().ends_with(CODE_SUFFIX);

        if !file_type.is_dir() && !is_code {
            if let Some(globs) = globs {
                if globs.is_match(path) {
                    tracing::debug!(
                        "Including file, which matches include filters ({:?}): {}",
                        patterns,
                        path.display()
                    );
                    return true;
                }
                tracing::debug!(
                    "Not syncing {}, does not match include filters ({:?})",
                    path.display(),
                    patterns
                );
                return false;
            }
        }

        if file_type.is_file() && !is_code {
            tracing::debug!("Not syncing file: {}", path.display());
            return false;
        }

        if file_type.is_dir() && !path.join(PACKAGE_MARKER).is_file() {
            tracing::debug!("Not syncing directory: {}", path.display());
            return false;
        }

        true
    }
}

/// `None` when there are no patterns, so "no globs configured" stays distinct
/// from "a set that matches nothing"
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map(Some).map_err(|source| Error::InvalidPattern {
        pattern: patterns.join(","),
        source,
    })
}
