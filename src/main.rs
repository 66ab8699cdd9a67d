//! Gitbundler - git repository archiver
//!
//! Reads repository URLs from an index file, mirror-clones each one, and
//! archives it as a git bundle file in a directory tree laid out by host
//! and repository path.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bundle;
mod cli;
mod commands;
mod error;
mod git;
mod index;
mod repo;
mod temp;
mod throttle;

use cli::{Cli, LogLevel};

/// Route log records to stderr. `RUST_LOG` takes precedence over the
/// `--log-level` flag when set.
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    if let Err(e) = commands::bundle::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(i32::from(e.exit_code()));
    }
}
