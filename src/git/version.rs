//! Git version detection and the minimum-version gate
//!
//! Every ref of a repository only lands in a bundle when `git bundle
//! create` understands `--all`, and `git clone` of a bundle file needs
//! git 2.3 or newer. The gate runs once before any repository is
//! touched.

use std::fmt;
use std::str::FromStr;

use crate::error::{BundlerError, Result};
use crate::git::runner::{GitRunner, describe_failure};

/// Oldest git this tool works with.
pub const MIN_GIT_VERSION: GitVersion = GitVersion {
    major: 2,
    minor: 3,
    patch: None,
};

/// A parsed `git --version` number.
///
/// Only major and minor take part in comparisons; the patch level is
/// kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl GitVersion {
    /// Whether this version is at least `minimum` (major.minor compare).
    pub fn satisfies(&self, minimum: &GitVersion) -> bool {
        (self.major, self.minor) >= (minimum.major, minimum.minor)
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for GitVersion {
    type Err = BundlerError;

    /// Parse the first line of `git --version` output.
    ///
    /// Accepts `git version MAJOR.MINOR` with an optional `.PATCH` and
    /// arbitrary vendor suffixes after it, e.g.
    /// `git version 2.39.5 (Apple Git-154)` or
    /// `git version 2.47.1.windows.1`.
    fn from_str(input: &str) -> Result<Self> {
        let unrecognized = || BundlerError::GitVersionUnrecognized {
            output: truncate_output(input),
        };

        let rest = input.trim().strip_prefix("git version ").ok_or_else(unrecognized)?;
        let (major, rest) = leading_digits(rest).ok_or_else(unrecognized)?;
        let rest = rest.strip_prefix('.').ok_or_else(unrecognized)?;
        let (minor, rest) = leading_digits(rest).ok_or_else(unrecognized)?;
        let patch = rest
            .strip_prefix('.')
            .and_then(leading_digits)
            .map(|(value, _)| value);

        Ok(GitVersion {
            major,
            minor,
            patch,
        })
    }
}

/// Split a leading run of ASCII digits off `input`.
fn leading_digits(input: &str) -> Option<(u32, &str)> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let value = input[..end].parse().ok()?;
    Some((value, &input[end..]))
}

fn truncate_output(output: &str) -> String {
    const MAX_CHARS: usize = 64;
    let trimmed = output.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        trimmed.chars().take(MAX_CHARS).collect()
    }
}

/// Ask the configured git program for its version.
pub fn read_git_version(git: &GitRunner) -> Result<GitVersion> {
    let output = git.run(["--version"], None)?;
    if !output.status.success() {
        return Err(BundlerError::GitUnavailable {
            program: git.program().display().to_string(),
            reason: describe_failure(&output),
        });
    }
    String::from_utf8_lossy(&output.stdout).parse()
}

/// Verify git is runnable and at least [`MIN_GIT_VERSION`].
pub fn check_git_version(git: &GitRunner) -> Result<GitVersion> {
    let version = read_git_version(git)?;
    if !version.satisfies(&MIN_GIT_VERSION) {
        return Err(BundlerError::GitVersionUnsupported {
            version: version.to_string(),
        });
    }
    Ok(version)
}
