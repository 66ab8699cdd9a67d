//! Tests that exercise a REAL git executable, and in some cases the
//! network. All of them are ignored by default; run with
//! `cargo test -- --ignored` on a machine where that is acceptable.

#![cfg(unix)]

mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use common::TestWorkspace;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
fn gitbundler_cmd() -> Command {
    Command::cargo_bin("gitbundler").unwrap()
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git is not on PATH");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

/// Create a real repository with one commit at `dir`.
fn init_source_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "--quiet"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    std::fs::write(dir.join("README.md"), "hello\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "--quiet", "-m", "initial"]);
}

#[test]
#[ignore = "Requires network access and a git executable on PATH"]
fn test_bundle_real_public_repository() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&["https://github.com/octocat/Hello-World.git"]);

    gitbundler_cmd()
        .current_dir(&ws.path)
        .arg(&index)
        .args(["--bundles-dir"])
        .arg(ws.bundles_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("updated: 1"));

    let bundle = ws
        .bundles_dir()
        .join("github.com/octocat/Hello-World.git.bundle");
    assert!(bundle.is_file());
    assert!(std::fs::metadata(&bundle).unwrap().len() > 0);

    // A bundle written by this tool must be a valid git bundle.
    Command::new("git")
        .arg("bundle")
        .arg("verify")
        .arg(&bundle)
        .assert()
        .success();
}

#[test]
#[ignore = "Requires network access and a git executable on PATH"]
fn test_second_run_leaves_real_bundle_unchanged() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&["https://github.com/octocat/Hello-World.git"]);

    let run = || {
        let mut cmd = gitbundler_cmd();
        cmd.current_dir(&ws.path)
            .arg(&index)
            .args(["--bundles-dir"])
            .arg(ws.bundles_dir());
        cmd
    };

    run().assert().success().stdout(predicate::str::contains("updated: 1"));
    run()
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged: 1"));
}

#[test]
#[ignore = "Requires network access and a git executable on PATH"]
fn test_nonexistent_repository_fails_the_batch() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&[
        "https://github.com/mike10004/this-repository-does-not-exist.git",
    ]);

    gitbundler_cmd()
        .current_dir(&ws.path)
        .arg(&index)
        .args(["--bundles-dir"])
        .arg(ws.bundles_dir())
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("failed: 1"));
}

#[test]
#[ignore = "Requires a git executable on PATH"]
fn test_file_url_end_to_end() {
    let ws = TestWorkspace::new();
    let source = ws.path.join("deathstar.git");
    init_source_repo(&source);

    let index = ws.write_index(&[&format!("file://{}", source.display())]);

    gitbundler_cmd()
        .current_dir(&ws.path)
        .arg(&index)
        .args(["--bundles-dir"])
        .arg(ws.bundles_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("updated: 1"));

    let files = common::list_files_recursively(&ws.bundles_dir());
    assert_eq!(files.len(), 1);
    let bundle = &files[0];
    assert!(bundle.starts_with(ws.bundles_dir().join("localhost")));
    assert!(bundle.to_string_lossy().ends_with("deathstar.git.bundle"));

    Command::new("git")
        .arg("bundle")
        .arg("verify")
        .arg(bundle)
        .assert()
        .success();
}

#[test]
#[ignore = "Requires a git executable on PATH"]
fn test_new_commit_triggers_a_rewrite() {
    let ws = TestWorkspace::new();
    let source = ws.path.join("deathstar.git");
    init_source_repo(&source);

    let index = ws.write_index(&[&format!("file://{}", source.display())]);
    let run = || {
        let mut cmd = gitbundler_cmd();
        cmd.current_dir(&ws.path)
            .arg(&index)
            .args(["--bundles-dir"])
            .arg(ws.bundles_dir());
        cmd
    };

    run().assert().success().stdout(predicate::str::contains("updated: 1"));
    run()
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged: 1"));

    std::fs::write(source.join("plans.md"), "exhaust port\n").unwrap();
    git(&source, &["add", "."]);
    git(&source, &["commit", "--quiet", "-m", "add plans"]);

    run().assert().success().stdout(predicate::str::contains("updated: 1"));
}
