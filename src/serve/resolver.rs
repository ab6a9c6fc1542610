//! Maps request paths onto the file system, confined to the web root.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::config::Config;

/// Where a request path landed.
///
/// `File` and `Directory` paths are always inside the web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    File(PathBuf),
    Directory(PathBuf),
    Missing(PathBuf),
    Forbidden,
}

/// Drops the query string and fragment from a request target.
pub fn strip_query(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    web_root: PathBuf,
}

impl PathResolver {
    /// `web_root` must already be canonical; [`Config::validate`] makes it so.
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.web_root.clone())
    }

    pub fn web_root(&self) -> &Path {
        &self.web_root
    }

    /// Resolves a raw request target.
    ///
    /// `/` means `/index.html`. Percent-escapes are decoded before `.` and
    /// `..` are collapsed, so an encoded traversal is caught the same way as
    /// a literal one. Any `..` that climbs above the root is `Forbidden`;
    /// the joined path then goes through [`PathResolver::classify`].
    pub fn resolve(&self, target: &str) -> ResolvedPath {
        let path = strip_query(target);
        let path = if path == "/" { "/index.html" } else { path };

        let Some(segments) = normalize(path) else {
            return ResolvedPath::Forbidden;
        };

        let mut joined = self.web_root.clone();
        joined.extend(&segments);
        self.classify(joined)
    }

    /// Classifies a path already joined under the web root.
    ///
    /// Existing paths are canonicalised (symlinks followed) and must still
    /// start with the web root, otherwise they are `Forbidden`.
    pub fn classify(&self, joined: PathBuf) -> ResolvedPath {
        let metadata = match std::fs::metadata(&joined) {
            Ok(metadata) => metadata,
            Err(_) => return ResolvedPath::Missing(joined),
        };

        let canonical = match joined.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) => return ResolvedPath::Missing(joined),
        };

        if !canonical.starts_with(&self.web_root) {
            tracing::warn!(
                path = %joined.display(),
                resolved = %canonical.display(),
                "Path resolved outside the web root"
            );
            return ResolvedPath::Forbidden;
        }

        if metadata.is_file() {
            ResolvedPath::File(canonical)
        } else if metadata.is_dir() {
            ResolvedPath::Directory(canonical)
        } else {
            ResolvedPath::Missing(canonical)
        }
    }
}

/// Decodes and collapses a request path into plain segments.
///
/// Returns `None` when the path cannot stay under the root: a `..` with
/// nothing left to pop, an undecodable escape or an embedded NUL.
fn normalize(path: &str) -> Option<Vec<String>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut stack: Vec<String> = Vec::new();
    for part in decoded.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => {
                stack.pop()?;
            }
            normal => stack.push(normal.to_string()),
        }
    }

    Some(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(
            normalize("/a/./b/../c"),
            Some(vec!["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn normalize_rejects_climbing_above_root() {
        assert_eq!(normalize("/a/../../etc/passwd"), None);
        assert_eq!(normalize("/%2e%2e/secret"), None);
    }
}
