//! Request classification
//!
//! Decides whether a path names a top-level module (`/<name>.js`) or a
//! relative import that has to be resolved against the referring module.

use hyper::Uri;

/// What kind of resolution a request needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind<'a> {
    /// `/<name>.js` with `<name>` a single path segment
    Module { name: &'a str },
    /// Any other path, resolved against the referring document
    RelativeImport {
        request_path: &'a str,
        referer_path: String,
    },
    /// Neither shape applies
    Unclassifiable,
}

/// Classify a request path (query already stripped) and optional referer.
///
/// `/<name>.js` is a top-level module unless the referring document is
/// itself a module: `import './utils.js'` inside `/lit.js` arrives as
/// `/utils.js` and has to be resolved against `lit`.
pub fn classify<'a>(path: &'a str, referer: Option<&str>) -> RequestKind<'a> {
    let referer_path = referer.and_then(referer_path);

    match (module_name_from_path(path), referer_path) {
        (Some(name), None) => RequestKind::Module { name },
        (Some(name), Some(referer_path)) if module_name_from_path(&referer_path).is_none() => {
            RequestKind::Module { name }
        }
        (_, Some(referer_path)) => RequestKind::RelativeImport {
            request_path: path,
            referer_path,
        },
        (None, None) => RequestKind::Unclassifiable,
    }
}

/// Extract `<name>` from `/<name>.js`
pub fn module_name_from_path(path: &str) -> Option<&str> {
    let name = path.strip_prefix('/')?.strip_suffix(".js")?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

/// Path component of a `Referer` header value.
///
/// Accepts absolute URLs as well as origin-relative paths.
pub fn referer_path(referer: &str) -> Option<String> {
    let referer = referer.trim();
    if referer.is_empty() {
        return None;
    }
    let uri: Uri = referer.parse().ok()?;
    let path = uri.path();
    if path.is_empty() {
        return Some("/".to_string());
    }
    Some(path.to_string())
}
