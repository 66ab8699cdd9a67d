//! Temp directory helpers for ephemeral clone directories.

use std::env;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Returns the base directory for ephemeral clone directories: the
/// `--temp-dir` override when given, the system temp dir otherwise.
pub fn temp_dir_base(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::temp_dir(),
    }
}

/// Create an ephemeral directory under `base` with the given prefix.
/// The directory and its contents are removed when the returned guard drops.
pub fn ephemeral_dir(base: &Path, prefix: &str) -> Result<TempDir> {
    std::fs::create_dir_all(base)?;
    let dir = tempfile::Builder::new().prefix(prefix).tempdir_in(base)?;
    Ok(dir)
}
