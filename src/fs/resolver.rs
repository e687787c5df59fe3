//! Maps request paths onto files under the document root.
//!
//! Every candidate is canonicalized and must stay inside the canonical
//! document root, so `..` segments and symlinks pointing elsewhere are
//! reported as missing.

use std::path::{Path, PathBuf};

use crate::http::mime::mime_type;

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Canonical location when `exists`, otherwise the unchecked candidate
    pub absolute_path: PathBuf,
    /// Regular file inside the document root
    pub exists: bool,
    pub content_type: &'static str,
}

/// Drops the query string and fragment from a request target.
pub fn strip_query(request_path: &str) -> &str {
    let end = request_path
        .find(['?', '#'])
        .unwrap_or(request_path.len());
    &request_path[..end]
}

/// Resolves `request_path` against `document_root`.
///
/// `document_root` is expected to be canonical already (the server
/// canonicalizes it once at startup). `/` maps to `index_file`.
pub async fn resolve(request_path: &str, document_root: &Path, index_file: &str) -> ResolvedFile {
    let path = strip_query(request_path);
    let relative = match path {
        "" | "/" => index_file,
        other => other.trim_start_matches('/'),
    };

    let candidate = document_root.join(relative);
    let content_type = mime_type(&candidate);

    let missing = |absolute_path: PathBuf| ResolvedFile {
        absolute_path,
        exists: false,
        content_type,
    };

    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(_) => return missing(candidate),
    };

    if !canonical.starts_with(document_root) {
        tracing::warn!(
            path = %request_path,
            resolved = %canonical.display(),
            "Rejected path outside document root"
        );
        return missing(candidate);
    }

    match tokio::fs::metadata(&canonical).await {
        Ok(meta) if meta.is_file() => ResolvedFile {
            absolute_path: canonical,
            exists: true,
            content_type,
        },
        _ => missing(canonical),
    }
}
