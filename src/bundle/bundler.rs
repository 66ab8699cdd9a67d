//! The bundling flow: mirror clone, staleness check, atomic bundle write
//!
//! Each repository is mirror-cloned into an ephemeral directory, then
//! `git bundle create --all` writes a bundle holding every ref. When a
//! bundle already exists on disk, the latest commit ids of the fresh
//! clone and the existing bundle are compared first; matching ids leave
//! the file untouched. The ephemeral clone is removed when the attempt
//! finishes, whatever the outcome.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::bundle::{BatchResult, BundleConfig, SyncOutcome};
use crate::error::{BundlerError, Result};
use crate::git::refs;
use crate::git::runner::{GitRunner, describe_failure};
use crate::repo::Repository;
use crate::temp;

/// Turns repository URLs into git bundle files under a bundles tree.
pub struct Bundler {
    bundles_dir: PathBuf,
    temp_base: PathBuf,
    git: GitRunner,
    config: BundleConfig,
}

impl Bundler {
    /// Create a bundler writing below `bundles_dir`, with ephemeral
    /// clones placed under `temp_base`.
    ///
    /// Both directories should be absolute: `git bundle create` runs
    /// with the clone as its working directory, so relative output
    /// paths would resolve against the wrong location.
    pub fn new(
        bundles_dir: PathBuf,
        temp_base: PathBuf,
        git: GitRunner,
        config: BundleConfig,
    ) -> Self {
        Self {
            bundles_dir,
            temp_base,
            git,
            config,
        }
    }

    /// Bundle every repository, one at a time in order.
    ///
    /// Per-repository clone and bundle failures are recorded, logged,
    /// and skipped over. Only environment-level errors such as a
    /// missing git executable abort the batch.
    pub fn bundle_all(&mut self, repositories: &[Repository]) -> Result<BatchResult> {
        let mut result = BatchResult::default();
        for repo in repositories {
            if self.config.no_external && repo.is_remote() {
                warn!(url = %repo.url, "offline mode, skipping repository that needs network access");
                result.record(SyncOutcome::SkippedFailure);
                continue;
            }
            self.config.throttler.throttle(&repo.host);
            let outcome = self.bundle(repo)?;
            result.record(outcome);
        }
        Ok(result)
    }

    /// Run one synchronization attempt for `repo`.
    pub fn bundle(&self, repo: &Repository) -> Result<SyncOutcome> {
        debug!(url = %repo.url, "bundling repository");

        // Dropped at the end of this attempt, removing the clone.
        let ephemeral = temp::ephemeral_dir(&self.temp_base, "clone-dest-")?;
        let clone_dir = ephemeral.path().join("mirror");

        let output = self.git.clone_mirror(&repo.url, &clone_dir)?;
        if !output.status.success() {
            error!(url = %repo.url, reason = %describe_failure(&output), "cloning failed");
            return Ok(SyncOutcome::SkippedFailure);
        }

        let bundle_path = repo.bundle_path(&self.bundles_dir);
        if !self.config.ignore_rev
            && bundle_path.exists()
            && self.bundle_matches_clone(&bundle_path, &clone_dir)?
        {
            info!(url = %repo.url, path = %bundle_path.display(), "bundle is up to date");
            return Ok(SyncOutcome::Unchanged);
        }

        self.write_bundle(repo, &clone_dir, &bundle_path)
    }

    /// Whether the existing bundle records the same latest commit as the
    /// fresh clone. Any unreadable side counts as a mismatch so the
    /// bundle gets rewritten from the fresh clone.
    fn bundle_matches_clone(&self, bundle_path: &Path, clone_dir: &Path) -> Result<bool> {
        let fresh = self.try_latest_commit(clone_dir)?;
        let existing = self.read_bundle_latest_commit(bundle_path)?;
        match (fresh, existing) {
            (Some(fresh), Some(existing)) => Ok(fresh == existing),
            _ => Ok(false),
        }
    }

    fn try_latest_commit(&self, repo_dir: &Path) -> Result<Option<String>> {
        match refs::read_latest_commit(&self.git, repo_dir) {
            Ok(commit) => Ok(Some(commit)),
            Err(err @ BundlerError::GitUnavailable { .. }) => Err(err),
            Err(err) => {
                warn!(path = %repo_dir.display(), reason = %err, "latest commit lookup failed");
                Ok(None)
            }
        }
    }

    /// Read the latest commit id recorded in an existing bundle file by
    /// cloning it into an ephemeral directory.
    fn read_bundle_latest_commit(&self, bundle_path: &Path) -> Result<Option<String>> {
        let probe = temp::ephemeral_dir(&self.temp_base, "bundle-probe-")?;
        let probe_clone = probe.path().join("bundle");

        let output = self.git.clone_plain(bundle_path, &probe_clone)?;
        if !output.status.success() {
            warn!(
                path = %bundle_path.display(),
                reason = %describe_failure(&output),
                "could not read existing bundle"
            );
            return Ok(None);
        }
        self.try_latest_commit(&probe_clone)
    }

    /// Create the bundle at a staging path and move it into place, so a
    /// prior bundle is replaced in a single rename and never left half
    /// written.
    fn write_bundle(
        &self,
        repo: &Repository,
        clone_dir: &Path,
        bundle_path: &Path,
    ) -> Result<SyncOutcome> {
        if let Some(parent) = bundle_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BundlerError::BundleWriteFailed {
                path: bundle_path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let staging = bundle_path.with_extension("bundle.part");
        // A crashed earlier run may have left a staging file behind.
        let _ = fs::remove_file(&staging);

        let output = self.git.bundle_create(clone_dir, &staging)?;
        if !output.status.success() {
            error!(
                url = %repo.url,
                path = %bundle_path.display(),
                reason = %describe_failure(&output),
                "bundling failed"
            );
            let _ = fs::remove_file(&staging);
            return Ok(SyncOutcome::SkippedFailure);
        }

        fs::rename(&staging, bundle_path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            BundlerError::BundleWriteFailed {
                path: bundle_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        info!(url = %repo.url, path = %bundle_path.display(), "bundled");
        Ok(SyncOutcome::Updated)
    }
}
