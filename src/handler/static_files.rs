//! Static file lookup
//!
//! Paths that name an existing file in the public directory are served
//! as-is; only the rest reach module resolution.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::resolve::classifier::referer_path;

const INDEX_FILE: &str = "index.html";

/// Find the file `path` names inside the canonical `public_dir`.
///
/// Directories fall back to their `index.html`. Returns `None` for
/// anything missing or outside the directory.
pub async fn find_public_file(public_dir: &Path, path: &str) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    let mut candidate = public_dir.join(relative);

    if relative.is_empty() || fs::metadata(&candidate).await.is_ok_and(|m| m.is_dir()) {
        candidate = candidate.join(INDEX_FILE);
    }

    let canonical = fs::canonicalize(&candidate).await.ok()?;
    if !canonical.starts_with(public_dir) {
        return None;
    }

    fs::metadata(&canonical)
        .await
        .is_ok_and(|m| m.is_file())
        .then_some(canonical)
}

/// Whether `referer` names a document served from `public_dir`.
///
/// Such documents are pages, not modules, even when they end in `.js`.
pub async fn is_public_referer(public_dir: &Path, referer: &str) -> bool {
    match referer_path(referer) {
        Some(path) => find_public_file(public_dir, &path).await.is_some(),
        None => false,
    }
}
