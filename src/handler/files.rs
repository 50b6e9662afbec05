//! File serving
//!
//! Reads a resolved file in full and pairs it with its content type.

use hyper::body::Bytes;
use std::path::Path;
use tokio::fs;

use crate::http::mime;
use crate::resolve::ResolveError;

/// File contents ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub data: Bytes,
    pub content_type: &'static str,
}

/// Read `path`, which has already been resolved and validated.
///
/// A failure here means the file changed after validation and surfaces
/// as [`ResolveError::IoFailure`].
pub async fn load(path: &Path) -> Result<LoadedFile, ResolveError> {
    let data = fs::read(path)
        .await
        .map_err(|source| ResolveError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(LoadedFile {
        data: Bytes::from(data),
        content_type: mime::content_type_for(path),
    })
}
