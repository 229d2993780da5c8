use git2::Repository;
use std::ffi::OsString;
use std::path::Path;

use super::VcsBackend;

/// `git clone --depth=1`, with an optional `@ref` suffix on the locator
pub struct GitBackend;

/// A git locator split into URL and optional ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator<'a> {
    pub url: &'a str,
    pub reference: Option<&'a str>,
}

impl<'a> RepoLocator<'a> {
    /// Split `url@ref` at the last `@`. A suffix containing `:` belongs to an
    /// scp-style address (`git@host:path`) and is not a ref.
    pub fn parse(locator: &'a str) -> Self {
        match locator.rsplit_once('@') {
            Some((url, reference))
                if !url.is_empty() && !reference.is_empty() && !reference.contains(':') =>
            {
                Self {
                    url,
                    reference: Some(reference),
                }
            }
            _ => Self {
                url: locator,
                reference: None,
            },
        }
    }
}

impl VcsBackend for GitBackend {
    fn program(&self) -> &'static str {
        "git"
    }

    fn checkout_args(&self, locator: &str, dest: &Path) -> Vec<OsString> {
        let locator = RepoLocator::parse(locator);
        let mut args: Vec<OsString> = vec!["clone".into(), "--depth=1".into(), "--quiet".into()];
        if let Some(reference) = locator.reference {
            args.push("--branch".into());
            args.push(reference.into());
        }
        args.push(locator.url.into());
        args.push(dest.into());
        args
    }

    fn revision(&self, checkout: &Path) -> Option<String> {
        let repo = Repository::open(checkout)
            .inspect_err(|e| tracing::debug!("Could not open checkout: {}", e))
            .ok()?;
        let commit = repo.head().ok()?.peel_to_commit().ok()?;
        Some(commit.id().to_string())
    }
}
