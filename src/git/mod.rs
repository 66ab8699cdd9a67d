//! Git subprocess operations
//!
//! This module is organized into submodules by concern:
//! - [`runner`]: subprocess wrapper around the git executable
//! - [`refs`]: latest-commit lookup for local clones
//! - [`version`]: git version detection and minimum-version gate

pub mod refs;
pub mod runner;
pub mod version;

pub use runner::GitRunner;
