//! Error types and handling for gitbundler
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostics.
//!
//! Git subprocess failures against a single repository (clone, bundle create,
//! ref lookup) are recovered per repository and never surface here as fatal
//! errors; everything in this enum aborts the run.

use miette::Diagnostic;
use thiserror::Error;

/// Exit code used when every repository in a non-empty batch failed.
pub const ERR_BUNDLE_FAIL: u8 = 2;

/// Main error type for gitbundler operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundlerError {
    // Index errors
    #[error("Failed to read index file: {path}: {reason}")]
    #[diagnostic(
        code(gitbundler::index::read_failed),
        help("Check that the index file exists and is readable")
    )]
    IndexRead { path: String, reason: String },

    // URL validation errors
    #[error("Invalid repository URL: {url}: {reason}")]
    #[diagnostic(
        code(gitbundler::url::invalid),
        help("Expected https://host/path/repo.git or file:///path/repo.git")
    )]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("Unsupported URL scheme '{scheme}': {url}")]
    #[diagnostic(
        code(gitbundler::url::unsupported_scheme),
        help("Allowed schemes: https (remote) and file (local)")
    )]
    UnsupportedScheme { url: String, scheme: String },

    // Git errors
    #[error("Failed to run git ('{program}'): {reason}")]
    #[diagnostic(
        code(gitbundler::git::unavailable),
        help("Check that git is installed, or point --git at the executable")
    )]
    GitUnavailable { program: String, reason: String },

    #[error("Unrecognized output from git --version: {output}")]
    #[diagnostic(code(gitbundler::git::version_unrecognized))]
    GitVersionUnrecognized { output: String },

    #[error("Unsupported git version {version}")]
    #[diagnostic(
        code(gitbundler::git::version_unsupported),
        help("git 2.3 or newer is required so that GIT_TERMINAL_PROMPT is honored")
    )]
    GitVersionUnsupported { version: String },

    #[error("Failed to read latest commit at {path}: {reason}")]
    #[diagnostic(code(gitbundler::git::ref_lookup_failed))]
    GitRefLookupFailed { path: String, reason: String },

    // Bundle write errors
    #[error("Failed to write bundle file: {path}: {reason}")]
    #[diagnostic(code(gitbundler::bundle::write_failed))]
    BundleWriteFailed { path: String, reason: String },

    // Batch errors
    #[error("All {attempted} repositories failed to bundle")]
    #[diagnostic(
        code(gitbundler::batch::all_failed),
        help("See the log for each repository's failure")
    )]
    AllBundlesFailed { attempted: usize },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(gitbundler::fs::io_error))]
    IoError { message: String },
}

impl BundlerError {
    /// Process exit code for this error when it escapes to `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            BundlerError::AllBundlesFailed { .. } => ERR_BUNDLE_FAIL,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for BundlerError {
    fn from(err: std::io::Error) -> Self {
        BundlerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundlerError>;
