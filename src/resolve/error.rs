//! Resolution failures
//!
//! `Display` is the plain-text body sent to the client and never carries
//! filesystem paths. `log_detail` is what goes into the event log.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Module not found: {name}")]
    ModuleNotFound { name: String, detail: String },

    #[error("Main file not found: {entry_file}")]
    EntryFileNotFound { entry_file: String, path: PathBuf },

    #[error("Context not found for referer: {referer_path}")]
    ContextMissing { referer_path: String },

    #[error("Invalid module context.")]
    ContextMismatch { expected: String, got: String },

    #[error("Invalid module context.")]
    RefererNotModule { referer_path: String },

    #[error("Not found.")]
    UnclassifiableRequest { path: String },

    #[error("File not found.")]
    PathEscapesRoot { resolved: PathBuf, root: PathBuf },

    #[error("File not found.")]
    FileNotFound { path: PathBuf },

    #[error("Internal server error.")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// HTTP status for this failure
    pub const fn status(&self) -> u16 {
        match self {
            Self::IoFailure { .. } => 500,
            _ => 404,
        }
    }

    /// Internal description for the event log
    pub fn log_detail(&self) -> String {
        match self {
            Self::ModuleNotFound { name, detail } => {
                format!("[ERROR] Module not found: {name} ({detail})")
            }
            Self::EntryFileNotFound { entry_file, path } => format!(
                "[ERROR] Main file not found: {entry_file} (looked for {})",
                path.display()
            ),
            Self::ContextMissing { referer_path } => {
                format!("[ERROR] Cookie not found for referer: {referer_path}")
            }
            Self::ContextMismatch { expected, got } => {
                format!("[ERROR] Invalid module context: expected {expected}, got {got}")
            }
            Self::RefererNotModule { referer_path } => {
                format!("[ERROR] Referer is not a module document: {referer_path}")
            }
            Self::UnclassifiableRequest { path } => {
                format!("[ERROR] Cannot resolve {path}: not a module request and no referer")
            }
            Self::PathEscapesRoot { resolved, root } => format!(
                "[SECURITY] Rejected {}: outside trusted root {}",
                resolved.display(),
                root.display()
            ),
            Self::FileNotFound { path } => {
                format!("[ERROR] File not found: {}", path.display())
            }
            Self::IoFailure { path, source } => {
                format!("[ERROR] Failed to read {}: {source}", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_indistinguishable_from_missing_file() {
        let escaped = ResolveError::PathEscapesRoot {
            resolved: PathBuf::from("/etc/passwd"),
            root: PathBuf::from("/srv/node_modules"),
        };
        let missing = ResolveError::FileNotFound {
            path: PathBuf::from("/srv/node_modules/lit/nope.js"),
        };

        assert_eq!(escaped.status(), missing.status());
        assert_eq!(escaped.to_string(), missing.to_string());
        assert_eq!(escaped.to_string(), "File not found.");
        // only the log knows the difference
        assert!(escaped.log_detail().contains("/etc/passwd"));
        assert_ne!(escaped.log_detail(), missing.log_detail());
    }

    #[test]
    fn test_bodies_hide_internal_paths() {
        let err = ResolveError::EntryFileNotFound {
            entry_file: "dist/index.js".to_string(),
            path: PathBuf::from("/srv/node_modules/lit/dist/index.js"),
        };
        assert_eq!(err.to_string(), "Main file not found: dist/index.js");
        assert!(err.log_detail().contains("/srv/node_modules"));

        let err = ResolveError::IoFailure {
            path: PathBuf::from("/srv/node_modules/lit/index.js"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_string(), "Internal server error.");
    }

    #[test]
    fn test_messages() {
        let err = ResolveError::ModuleNotFound {
            name: "doesnotexist".to_string(),
            detail: "no package.json".to_string(),
        };
        assert_eq!(err.to_string(), "Module not found: doesnotexist");
        assert_eq!(err.status(), 404);

        let err = ResolveError::ContextMissing {
            referer_path: "/lit.js".to_string(),
        };
        assert_eq!(err.to_string(), "Context not found for referer: /lit.js");
        assert!(err.log_detail().contains("Cookie not found for referer"));

        let err = ResolveError::ContextMismatch {
            expected: "b".to_string(),
            got: "a".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid module context.");
        assert!(err.log_detail().contains("expected b, got a"));

        let err = ResolveError::RefererNotModule {
            referer_path: "/lib/deep.js".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid module context.");
        assert_eq!(
            err.log_detail(),
            "[ERROR] Referer is not a module document: /lib/deep.js"
        );
    }
}
