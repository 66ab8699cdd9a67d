//! Repository bundling
//!
//! [`bundler::Bundler`] turns repository URLs into git bundle files on
//! disk. This module also holds the small value types shared by the
//! bundling flow: per-repository outcomes, batch accounting, and the
//! knobs that alter how a batch runs.

use std::time::Duration;

use crate::throttle::{DelayThrottler, Throttler};

pub mod bundler;

pub use bundler::Bundler;

/// Default pause between requests to the same host.
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(1);

/// What happened to a single repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new or refreshed bundle file was written.
    Updated,
    /// The existing bundle already matches the remote; nothing written.
    Unchanged,
    /// Cloning or bundling failed; the repository was skipped.
    SkippedFailure,
}

/// Knobs that alter how a batch of repositories is bundled.
pub struct BundleConfig {
    /// Rewrite bundles without comparing latest commits first.
    pub ignore_rev: bool,
    /// Skip repositories that would require network access.
    pub no_external: bool,
    /// Pacing between operations against the same host.
    pub throttler: Box<dyn Throttler>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            ignore_rev: false,
            no_external: false,
            throttler: Box::new(DelayThrottler::new(DEFAULT_THROTTLE_DELAY)),
        }
    }
}

/// Tally of outcomes across one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Unchanged => self.unchanged += 1,
            SyncOutcome::SkippedFailure => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.unchanged + self.failed
    }

    pub fn succeeded(&self) -> usize {
        self.updated + self.unchanged
    }

    /// True when every repository in a non-empty batch failed.
    pub fn is_total_failure(&self) -> bool {
        self.total() > 0 && self.succeeded() == 0
    }
}
