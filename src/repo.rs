//! Repository URL parsing and bundle path derivation
//!
//! A [`Repository`] is a validated index line. Parsing enforces the scheme
//! allow-list and the structural rules that make the bundle tree layout
//! well defined: a host (or `file`'s implicit localhost), no explicit port,
//! and at least two path segments so every repository sits under a prefix
//! directory.

use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{BundlerError, Result};

/// Schemes accepted in index files. `file` exists for offline and test use.
pub const SUPPORTED_SCHEMES: [&str; 2] = ["https", "file"];

/// Suffix appended to the repository name to form the bundle file name.
const BUNDLE_SUFFIX: &str = ".bundle";

/// A validated repository location parsed from one index line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Original URL string as given in the index file
    pub url: String,
    /// URL scheme, lowercased (https or file)
    pub scheme: String,
    /// Host component; a file URL without a host resolves to localhost
    pub host: String,
    /// Percent-decoded path segments before the repository name, joined with '/'
    pub path_prefix: String,
    /// Percent-decoded final path segment naming the repository
    pub repo_name: String,
}

impl Repository {
    /// Parse and validate one index line.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = Url::parse(input).map_err(|e| invalid(input, e.to_string()))?;

        let scheme = parsed.scheme().to_string();
        if !SUPPORTED_SCHEMES.contains(&scheme.as_str()) {
            return Err(BundlerError::UnsupportedScheme {
                url: input.to_string(),
                scheme,
            });
        }

        // The url crate strips scheme-default ports (e.g. https :443), so the
        // raw authority is inspected to reject every explicit port.
        if has_explicit_port(input) {
            return Err(invalid(input, "explicit port is not supported"));
        }

        let host = match parsed.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ if scheme == "file" => "localhost".to_string(),
            _ => return Err(invalid(input, "host is required")),
        };

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();
        if segments.len() < 2 {
            return Err(invalid(
                input,
                "expected at least two path segments (prefix and repository name)",
            ));
        }

        let mut decoded = Vec::with_capacity(segments.len());
        for segment in &segments {
            decoded.push(decode_segment(segment, input)?);
        }
        let repo_name = decoded
            .pop()
            .ok_or_else(|| invalid(input, "missing repository name"))?;
        let path_prefix = decoded.join("/");

        Ok(Repository {
            url: input.to_string(),
            scheme,
            host,
            path_prefix,
            repo_name,
        })
    }

    /// Filesystem location of this repository's bundle under `bundles_dir`:
    /// `<bundles_dir>/<host>/<path prefix>/<repo name>.bundle`.
    pub fn bundle_path(&self, bundles_dir: &Path) -> PathBuf {
        let mut path = bundles_dir.join(&self.host);
        for part in self.path_prefix.split('/') {
            path.push(part);
        }
        path.push(format!("{}{}", self.repo_name, BUNDLE_SUFFIX));
        path
    }

    /// True when archiving this repository requires network access.
    pub fn is_remote(&self) -> bool {
        self.scheme != "file"
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn invalid(url: &str, reason: impl Into<String>) -> BundlerError {
    BundlerError::InvalidRepositoryUrl {
        url: url.to_string(),
        reason: reason.into(),
    }
}

/// Percent-decode one path segment and require the result to be a safe
/// single file name (decoding must not smuggle in separators or dot dirs).
fn decode_segment(segment: &str, url: &str) -> Result<String> {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|e| invalid(url, format!("path segment '{segment}' is not valid UTF-8: {e}")))?
        .into_owned();
    if decoded.is_empty()
        || decoded == "."
        || decoded == ".."
        || decoded.contains(['/', '\\'])
    {
        return Err(invalid(
            url,
            format!("path segment '{segment}' does not decode to a safe file name"),
        ));
    }
    Ok(decoded)
}

/// Whether the raw URL spells out a port, including a scheme-default one.
fn has_explicit_port(input: &str) -> bool {
    let Some((_, rest)) = input.split_once("://") else {
        return false;
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    // An IPv6 literal keeps its colons inside brackets.
    if let Some(close) = host_port.find(']') {
        return host_port[close..].contains(':');
    }
    host_port.contains(':')
}
