//! Subprocess wrapper around the git executable
//!
//! All git work goes through [`GitRunner`], which spawns the configured
//! git program with `GIT_TERMINAL_PROMPT=0` so that repositories requiring
//! credentials fail immediately instead of hanging on a password prompt.
//! Captured stdout/stderr stay with the caller for error reporting.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{BundlerError, Result};

/// Runs git subcommands against a configurable git executable.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
}

impl GitRunner {
    /// Create a runner for the given git program.
    ///
    /// `program` is resolved through `PATH` like any spawned command, so
    /// plain `git` works as well as an absolute path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The git executable this runner spawns.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run git with the given arguments, optionally inside `cwd`.
    ///
    /// Waits for completion and returns the captured output. A nonzero
    /// exit status is not an error here; callers inspect `output.status`
    /// and decide. Failing to spawn the program at all is
    /// [`BundlerError::GitUnavailable`].
    pub fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        debug!(
            program = %self.program.display(),
            args = ?args,
            cwd = ?cwd,
            "running git"
        );

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        command.output().map_err(|e| BundlerError::GitUnavailable {
            program: self.program.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Mirror-clone `url` into `destination`.
    ///
    /// A mirror clone carries every ref of the remote, which is exactly
    /// what `git bundle create --all` needs afterwards.
    pub fn clone_mirror(&self, url: &str, destination: &Path) -> Result<Output> {
        self.run(
            [
                OsStr::new("clone"),
                OsStr::new("--mirror"),
                OsStr::new(url),
                destination.as_os_str(),
            ],
            None,
        )
    }

    /// Plain-clone a local source (a directory or a bundle file) into
    /// `destination`. Used to inspect the refs recorded in an existing
    /// bundle.
    pub fn clone_plain(&self, source: &Path, destination: &Path) -> Result<Output> {
        self.run(
            [
                OsStr::new("clone"),
                source.as_os_str(),
                destination.as_os_str(),
            ],
            None,
        )
    }

    /// Create a bundle holding all refs of the repository at `repo_dir`.
    pub fn bundle_create(&self, repo_dir: &Path, bundle_path: &Path) -> Result<Output> {
        self.run(
            [
                OsStr::new("bundle"),
                OsStr::new("create"),
                bundle_path.as_os_str(),
                OsStr::new("--all"),
            ],
            Some(repo_dir),
        )
    }
}

/// Summarize a failed git invocation for log output.
pub fn describe_failure(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {}", output.status, stderr)
    }
}
