//! Latest-commit lookup for local clones
//!
//! Staleness of an existing bundle is decided by comparing the most
//! recently committed object name on any ref, read with
//! `git for-each-ref` from a local repository directory.

use std::path::Path;

use crate::error::{BundlerError, Result};
use crate::git::runner::{GitRunner, describe_failure};

/// Arguments that print the single most recent commit id across all refs.
pub const LATEST_COMMIT_ARGS: [&str; 4] = [
    "for-each-ref",
    "--count=1",
    "--sort=-committerdate",
    "--format=%(objectname)",
];

/// Read the latest commit id of the repository at `repo_dir`.
pub fn read_latest_commit(git: &GitRunner, repo_dir: &Path) -> Result<String> {
    let output = git.run(LATEST_COMMIT_ARGS, Some(repo_dir))?;
    if !output.status.success() {
        return Err(BundlerError::GitRefLookupFailed {
            path: repo_dir.display().to_string(),
            reason: describe_failure(&output),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_commit_id(&stdout).map_err(|reason| BundlerError::GitRefLookupFailed {
        path: repo_dir.display().to_string(),
        reason,
    })
}

/// Extract and validate the commit id from for-each-ref output.
fn parse_commit_id(stdout: &str) -> std::result::Result<String, String> {
    let line = stdout.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Err("repository has no refs".to_string());
    }
    if line.len() != 40 || !line.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid commit id from for-each-ref: {line}"));
    }
    Ok(line.to_string())
}
