//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Verbosity choices for `--log-level`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by the tracing env filter.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Gitbundler - git repository archiver
#[derive(Parser, Debug)]
#[command(
    name = "gitbundler",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Archive git repositories as bundle files",
    long_about = "Gitbundler reads repository URLs from an index file, mirror-clones each \
                  repository, and archives it as a git bundle in a directory tree laid out \
                  by host and repository path. An existing bundle is left untouched when \
                  the repository has no new commits.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  gitbundler repos.txt                        \x1b[90m# Bundle into ./repositories\x1b[0m\n   \
                  gitbundler repos.txt --bundles-dir /archive \x1b[90m# Choose the bundles tree top\x1b[0m\n   \
                  gitbundler repos.txt --ignore-rev           \x1b[90m# Rewrite bundles unconditionally\x1b[0m\n   \
                  gitbundler repos.txt --no-external          \x1b[90m# Offline: local repositories only\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// File listing one repository URL per line
    #[arg(value_name = "INDEXFILE")]
    pub indexfile: PathBuf,

    /// Set log level
    #[arg(
        short = 'l',
        long,
        value_enum,
        ignore_case = true,
        default_value = "info",
        value_name = "LEVEL"
    )]
    pub log_level: LogLevel,

    /// Set bundles tree top directory
    #[arg(long, default_value = "repositories", value_name = "DIRNAME")]
    pub bundles_dir: PathBuf,

    /// Set temp directory for ephemeral clones
    #[arg(long, env = "GITBUNDLER_TEMP_DIR", value_name = "DIRNAME")]
    pub temp_dir: Option<PathBuf>,

    /// Set per-host throttling delay
    #[arg(
        long,
        default_value = "1",
        value_parser = parse_delay,
        value_name = "SECONDS"
    )]
    pub delay: Duration,

    /// Set the git executable to run
    #[arg(
        long,
        env = "GITBUNDLER_GIT",
        default_value = "git",
        value_name = "PROGRAM"
    )]
    pub git: PathBuf,

    /// Rewrite bundles without comparing latest commits first
    #[arg(long)]
    pub ignore_rev: bool,

    /// Skip repositories that require network access
    #[arg(long)]
    pub no_external: bool,
}

fn parse_delay(input: &str) -> Result<Duration, String> {
    let seconds: f64 = input
        .parse()
        .map_err(|_| format!("invalid number: {input}"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("delay must be a number >= 0: {input}"))
}
