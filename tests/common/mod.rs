//! Common test utilities for gitbundler integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fake git covering the subcommands the binary runs. clone makes the
/// destination directory, bundle writes known bytes to the output path,
/// for-each-ref prints a commit id derived from the repository
/// directory, so a fresh clone never matches an existing bundle.
#[allow(dead_code)]
pub const FAKE_GIT: &str = r#"#!/bin/bash
case "$1" in
  --version) echo "git version 2.39.5" ;;
  clone) mkdir -p "${@: -1:1}" ;;
  bundle) echo bundle-data > "${@: -2:1}" ;;
  for-each-ref) printf '%s' "$PWD" | sha1sum | cut -d' ' -f1 ;;
  *) exit 1 ;;
esac
"#;

/// Fake git whose commit id never changes, so an existing bundle always
/// compares equal to a fresh clone.
#[allow(dead_code)]
pub const FAKE_GIT_FIXED_SHA: &str = r#"#!/bin/bash
case "$1" in
  --version) echo "git version 2.39.5" ;;
  clone) mkdir -p "${@: -1:1}" ;;
  bundle) echo bundle-data > "${@: -2:1}" ;;
  for-each-ref) echo 930e77627aa807266746f2795b59b890cba70499 ;;
  *) exit 1 ;;
esac
"#;

/// Fake git whose clone fails the way a nonexistent or auth-requiring
/// remote repository does.
#[allow(dead_code)]
pub const FAKE_GIT_CLONE_FAILS: &str = r#"#!/bin/bash
case "$1" in
  --version) echo "git version 2.39.5" ;;
  clone)
    echo "fatal: could not read Username for 'https://github.com': terminal prompts disabled" >&2
    exit 128
    ;;
  *) exit 0 ;;
esac
"#;

/// Fake git reporting a version below the minimum requirement.
#[allow(dead_code)]
pub const FAKE_GIT_OLD_VERSION: &str = r#"#!/bin/bash
case "$1" in
  --version) echo "git version 1.9.1" ;;
  *) exit 1 ;;
esac
"#;

/// A scratch directory for one integration test
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Bundles tree top used by tests that pass `--bundles-dir`
    pub fn bundles_dir(&self) -> PathBuf {
        self.path.join("bundles")
    }

    /// Write an index file listing the given URLs, one per line
    pub fn write_index(&self, urls: &[&str]) -> PathBuf {
        let mut content = urls.join("\n");
        content.push('\n');
        self.write_file("repos.txt", &content);
        self.path.join("repos.txt")
    }

    /// Install an executable fake git script into the workspace
    #[cfg(unix)]
    pub fn write_fake_git(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path.join("fakegit");
        std::fs::write(&path, script).expect("Failed to write fake git script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake git script executable");
        path
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Every regular file below `root`, for asserting exactly which bundles
/// a run produced.
#[allow(dead_code)]
pub fn list_files_recursively(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_write_index_lists_one_url_per_line() {
        let workspace = TestWorkspace::new();
        workspace.write_index(&["https://example.com/a/b.git", "", "file:///x/y.git"]);
        assert_eq!(
            workspace.read_file("repos.txt"),
            "https://example.com/a/b.git\n\nfile:///x/y.git\n"
        );
    }
}
