//! Repository index files: one URL per line, blank lines ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{BundlerError, Result};

/// A repository index file on disk. Opening is deferred to [`IndexFile::urls`],
/// and every call yields a fresh pass over the file.
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate the non-blank lines of the index in file order.
    pub fn urls(&self) -> Result<UrlLines> {
        let file = File::open(&self.path).map_err(|e| self.read_error(&e))?;
        Ok(UrlLines {
            path: self.path.clone(),
            lines: BufReader::new(file).lines(),
        })
    }

    fn read_error(&self, err: &std::io::Error) -> BundlerError {
        BundlerError::IndexRead {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Iterator over the trimmed, non-blank lines of an index file.
#[derive(Debug)]
pub struct UrlLines {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl Iterator for UrlLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_string()));
                    }
                }
                Err(e) => {
                    return Some(Err(BundlerError::IndexRead {
                        path: self.path.display().to_string(),
                        reason: e.to_string(),
                    }));
                }
            }
        }
    }
}
