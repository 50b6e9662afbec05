//! Relative import resolution
//!
//! A browser following `import './utils.js'` from `/lit.js` asks for
//! `/utils.js` and says nothing about `lit` except through the referer
//! and the context cookie. Both are checked, then the path is resolved
//! against the directory of the module's entry file.
//!
//! Every path is anchored to the original entry file's directory, not to
//! the file that actually contains the import.

use std::path::{Path, PathBuf};
use tokio::fs;

use super::classifier::module_name_from_path;
use super::context::ModuleContext;
use super::error::ResolveError;
use super::module::is_file;

/// Resolve `request_path` for a document at `referer_path`.
///
/// `root` must already be canonical. The returned path is canonical and
/// inside `root`.
pub async fn resolve_relative(
    root: &Path,
    request_path: &str,
    referer_path: &str,
    context: Option<&ModuleContext>,
) -> Result<PathBuf, ResolveError> {
    let Some(referenced_module) = module_name_from_path(referer_path) else {
        return Err(ResolveError::RefererNotModule {
            referer_path: referer_path.to_string(),
        });
    };

    let Some(context) = context else {
        return Err(ResolveError::ContextMissing {
            referer_path: referer_path.to_string(),
        });
    };

    if context.module_name != referenced_module {
        return Err(ResolveError::ContextMismatch {
            expected: referenced_module.to_string(),
            got: context.module_name.clone(),
        });
    }

    let candidate = base_dir(root, context).join(request_path.trim_start_matches('/'));

    let Ok(resolved) = fs::canonicalize(&candidate).await else {
        return Err(ResolveError::FileNotFound { path: candidate });
    };

    if !resolved.starts_with(root) {
        return Err(ResolveError::PathEscapesRoot {
            resolved,
            root: root.to_path_buf(),
        });
    }

    if !is_file(&resolved).await {
        return Err(ResolveError::FileNotFound { path: resolved });
    }

    Ok(resolved)
}

/// Directory of `<root>/<module>/<entry>`, before canonicalization
fn base_dir(root: &Path, context: &ModuleContext) -> PathBuf {
    let entry = root
        .join(&context.module_name)
        .join(context.entry_file.trim_start_matches('/'));
    entry
        .parent()
        .map_or_else(|| root.join(&context.module_name), Path::to_path_buf)
}
