//! Integration tests for the charm-helpers-sync binary

mod common;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ENV_KEYS: &[&str] = &["REPO", "BRANCH", "DESTINATION", "OPTIONS", "VCS", "PACKAGE"];

fn sync_cmd() -> Command {
    let mut cmd = Command::cargo_bin("charm-helpers-sync").unwrap();
    cmd.env_remove("RUST_LOG");
    for key in ENV_KEYS {
        cmd.env_remove(format!("CHARM_HELPERS_SYNC_{key}"));
    }
    cmd
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    sync_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--destination"))
        .stdout(predicate::str::contains("--repository"));
}

#[test]
fn test_cli_version() {
    sync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("charm-helpers-sync"));
}

#[test]
fn test_missing_destination_exits_one() {
    let temp = TempDir::new().unwrap();
    sync_cmd()
        .current_dir(temp.path())
        .arg("core")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No destination dir"));
}

#[test]
fn test_missing_modules_exits_one() {
    let temp = TempDir::new().unwrap();
    sync_cmd()
        .current_dir(temp.path())
        .args(["-d", "hooks/charmhelpers"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No modules to sync"));
}

#[test]
fn test_missing_config_file_exits_one() {
    let temp = TempDir::new().unwrap();
    sync_cmd()
        .current_dir(temp.path())
        .args(["-c", "charm-helpers.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_unparseable_config_exits_one() -> Result<()> {
    let temp = TempDir::new()?;
    let config = temp.path().join("charm-helpers.yaml");
    fs::write(&config, "destination: [unterminated\n")?;

    sync_cmd()
        .current_dir(temp.path())
        .arg("-c")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not parse config"));
    Ok(())
}

#[test]
fn test_print_config_does_not_fetch() -> Result<()> {
    let temp = TempDir::new()?;
    let config = temp.path().join("charm-helpers.yaml");
    fs::write(
        &config,
        concat!(
            "repo: https://example.invalid/helpers\n",
            "destination: lib/charmhelpers\n",
            "include:\n",
            "  - core\n",
            "  - contrib.storage:\n",
            "      - linux\n",
        ),
    )?;

    sync_cmd()
        .current_dir(temp.path())
        .arg("-c")
        .arg(&config)
        .args(["-d", "hooks/charmhelpers", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("destination: hooks/charmhelpers"))
        .stdout(predicate::str::contains("contrib.storage"))
        .stdout(predicate::str::contains("linux"));
    assert!(!temp.path().join("hooks").exists());
    Ok(())
}

#[test]
fn test_env_sits_between_file_and_flags() -> Result<()> {
    let temp = TempDir::new()?;
    let config = temp.path().join("charm-helpers.yaml");
    fs::write(
        &config,
        "repo: https://example.invalid/helpers\ndestination: lib/file\ninclude: [core]\n",
    )?;

    sync_cmd()
        .current_dir(temp.path())
        .arg("-c")
        .arg(&config)
        .arg("--print-config")
        .env("CHARM_HELPERS_SYNC_DESTINATION", "lib/env")
        .env("CHARM_HELPERS_SYNC_OPTIONS", "inc=*.txt,inc=*.dat")
        .assert()
        .success()
        .stdout(predicate::str::contains("destination: lib/env"))
        .stdout(predicate::str::contains("inc=*.dat"));

    sync_cmd()
        .current_dir(temp.path())
        .arg("-c")
        .arg(&config)
        .args(["-d", "lib/flag", "--print-config"])
        .env("CHARM_HELPERS_SYNC_DESTINATION", "lib/env")
        .assert()
        .success()
        .stdout(predicate::str::contains("destination: lib/flag"));
    Ok(())
}

#[test]
fn test_failed_fetch_cleans_scratch_and_fails() -> Result<()> {
    let temp = TempDir::new()?;
    let scratch_parent = temp.path().join("tmp");
    fs::create_dir(&scratch_parent)?;
    let missing_repo = temp.path().join("no-such-repo");

    sync_cmd()
        .current_dir(temp.path())
        .env("TMPDIR", &scratch_parent)
        .args(["-D", "-d", "hooks/charmhelpers", "-r"])
        .arg(common::file_url(&missing_repo))
        .arg("core")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cleaning up"));

    assert_eq!(fs::read_dir(&scratch_parent)?.count(), 0);
    assert!(!temp.path().join("hooks/charmhelpers").exists());
    Ok(())
}

#[test]
fn test_sync_from_local_git_repository() -> Result<()> {
    if !common::has_git() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    let upstream = temp.path().join("upstream");
    common::helpers_tree(&upstream)?;
    common::init_git_repo(&upstream)?;

    let project = temp.path().join("charm");
    fs::create_dir(&project)?;
    fs::write(
        project.join("charm-helpers-hooks.yaml"),
        format!(
            concat!(
                "repo: {}\n",
                "destination: hooks/charmhelpers\n",
                "options: inc=*.txt\n",
                "include:\n",
                "  - core\n",
                "  - contrib.sample\n",
                "  - missing.module\n",
                "  - foo:\n",
                "      - bar\n",
            ),
            common::file_url(&upstream)
        ),
    )?;

    sync_cmd()
        .current_dir(&project)
        .args(["-c", "charm-helpers-hooks.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 3 modules"))
        .stdout(predicate::str::contains("missing.module"))
        .stdout(predicate::str::contains("upstream at"))
        .stderr(predicate::str::contains("Cloning out"));

    let dest = project.join("hooks/charmhelpers");
    assert!(dest.join("__init__.py").is_file());
    assert!(dest.join("core/hookenv.py").is_file());
    assert!(dest.join("core/NOTES.txt").is_file());
    assert!(dest.join("contrib/__init__.py").is_file());
    assert!(dest.join("contrib/sample/b.txt").is_file());
    assert!(!dest.join("contrib/sample/c.dat").exists());
    assert!(dest.join("foo/bar.py").is_file());
    assert!(!project.join("hooks/__init__.py").exists());
    Ok(())
}

#[test]
fn test_ref_suffix_selects_branch() -> Result<()> {
    if !common::has_git() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    let upstream = temp.path().join("upstream");
    common::helpers_tree(&upstream)?;
    let repo = common::init_git_repo(&upstream)?;

    let head = repo.head()?.peel_to_commit()?;
    repo.branch("stable", &head, false)?;
    common::write(&upstream, "charmhelpers/extra/__init__.py", "")?;
    common::write(&upstream, "charmhelpers/extra/tool.py", "TOOL = 1\n")?;
    common::commit_all(&repo, "Add extra")?;

    let project = temp.path().join("charm");
    fs::create_dir(&project)?;

    sync_cmd()
        .current_dir(&project)
        .args(["-d", "lib/charmhelpers", "-r"])
        .arg(format!("{}@stable", common::file_url(&upstream)))
        .args(["core", "extra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 module"));
    assert!(!project.join("lib/charmhelpers/extra").exists());

    sync_cmd()
        .current_dir(&project)
        .args(["-d", "lib/charmhelpers", "-r"])
        .arg(common::file_url(&upstream))
        .args(["core", "extra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 2 modules"));
    assert!(project.join("lib/charmhelpers/extra/tool.py").is_file());
    Ok(())
}
