//! The bundling run: check git, read the index, bundle each repository

use std::env;
use std::path::{Path, PathBuf};

use console::Style;
use tracing::{debug, warn};

use crate::bundle::{BatchResult, BundleConfig, Bundler};
use crate::cli::Cli;
use crate::error::{BundlerError, Result};
use crate::git::GitRunner;
use crate::git::version::check_git_version;
use crate::index::IndexFile;
use crate::repo::Repository;
use crate::temp;
use crate::throttle::DelayThrottler;

/// Execute one bundling run as described by the parsed CLI arguments.
pub fn run(cli: &Cli) -> Result<BatchResult> {
    let git = GitRunner::new(&cli.git);
    let version = check_git_version(&git)?;
    debug!(version = %version, program = %cli.git.display(), "git version check passed");

    let index = IndexFile::new(cli.indexfile.clone());
    let repositories = load_repositories(&index)?;
    debug!(
        count = repositories.len(),
        index = %index.path().display(),
        "repository urls in index"
    );

    let config = BundleConfig {
        ignore_rev: cli.ignore_rev,
        no_external: cli.no_external,
        throttler: Box::new(DelayThrottler::new(cli.delay)),
    };
    let mut bundler = Bundler::new(
        absolute(&cli.bundles_dir)?,
        temp::temp_dir_base(cli.temp_dir.as_deref()),
        git,
        config,
    );

    let result = bundler.bundle_all(&repositories)?;
    report(&result);

    if result.is_total_failure() {
        return Err(BundlerError::AllBundlesFailed {
            attempted: result.total(),
        });
    }
    if result.failed > 0 {
        warn!(
            "only {} of {} bundlings succeeded",
            result.succeeded(),
            result.total()
        );
    }
    Ok(result)
}

/// Parse every index line up front, so one invalid URL aborts the run
/// before any repository is cloned.
fn load_repositories(index: &IndexFile) -> Result<Vec<Repository>> {
    index
        .urls()?
        .map(|line| Repository::parse(&line?))
        .collect()
}

/// `git bundle create` runs with the clone as its working directory, so
/// the bundles tree top must not stay relative to the caller's.
fn absolute(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(dir))
    }
}

fn report(result: &BatchResult) {
    if result.total() == 0 {
        println!(
            "{}",
            Style::new()
                .dim()
                .apply_to("Index file is empty, nothing to do")
        );
        return;
    }

    println!(
        "{}",
        Style::new()
            .bold()
            .apply_to(format!("Processed {} repository url(s)", result.total()))
    );
    println!(
        "  {} {}",
        Style::new().bold().green().apply_to("updated:"),
        result.updated
    );
    println!(
        "  {} {}",
        Style::new().bold().cyan().apply_to("unchanged:"),
        result.unchanged
    );
    let failed_style = if result.failed > 0 {
        Style::new().bold().red()
    } else {
        Style::new().bold()
    };
    println!(
        "  {} {}",
        failed_style.apply_to("failed:"),
        result.failed
    );
}
