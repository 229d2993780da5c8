//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::Result;
use git2::{IndexAddOption, Repository, Signature};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn write(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Lay out a small charm-helpers checkout under `root`
pub fn helpers_tree(root: &Path) -> Result<()> {
    let files = [
        ("charmhelpers/__init__.py", "# bootstrap\n"),
        ("charmhelpers/core/__init__.py", ""),
        ("charmhelpers/core/hookenv.py", "def log(msg): pass\n"),
        ("charmhelpers/core/host.py", "def service(name): pass\n"),
        ("charmhelpers/core/NOTES.txt", "notes\n"),
        ("charmhelpers/fetch/__init__.py", ""),
        ("charmhelpers/fetch/archiveurl.py", "class ArchiveUrlFetchHandler: pass\n"),
        ("charmhelpers/contrib/__init__.py", "# contrib\n"),
        ("charmhelpers/contrib/sample/__init__.py", ""),
        ("charmhelpers/contrib/sample/a.py", "A = 1\n"),
        ("charmhelpers/contrib/sample/b.txt", "b\n"),
        ("charmhelpers/contrib/sample/c.dat", "c\n"),
        ("charmhelpers/contrib/openstack/__init__.py", ""),
        ("charmhelpers/contrib/openstack/utils.py", "def os_release(): pass\n"),
        ("charmhelpers/contrib/openstack/templates/haproxy.cfg", "global\n"),
        ("charmhelpers/contrib/openstack/templates/ceph.conf", "[global]\n"),
        ("charmhelpers/foo/__init__.py", "# foo\n"),
        ("charmhelpers/foo/bar.py", "BAR = 1\n"),
        ("charmhelpers/foo/baz/__init__.py", ""),
        ("charmhelpers/foo/baz/impl.py", "BAZ = 1\n"),
        ("charmhelpers/foo/qux.py", "QUX = 1\n"),
        ("README.md", "charm-helpers\n"),
    ];
    for (rel, content) in files {
        write(root, rel, content)?;
    }
    Ok(())
}

/// Every file under `root`, relative to it
pub fn list_files(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Every directory under `root` (inclusive)
pub fn list_dirs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

pub fn has_git() -> bool {
    which::which("git").is_ok()
}

/// `git init` `path` and commit everything in it
pub fn init_git_repo(path: &Path) -> Result<Repository> {
    let repo = Repository::init(path)?;
    commit_all(&repo, "Initial commit")?;
    Ok(repo)
}

/// Stage the whole work tree and commit it on HEAD
pub fn commit_all(repo: &Repository, message: &str) -> Result<git2::Oid> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::now("Test User", "test@example.com")?;

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?)
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
