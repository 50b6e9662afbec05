//! Top-level module resolution
//!
//! `/<name>.js` maps to `<root>/<name>/package.json`, whose `main` field
//! names the file to serve. Only `main` is consulted; `exports`,
//! `module` and `browser` are ignored.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::context::ModuleContext;
use super::error::ResolveError;

const MANIFEST_FILE: &str = "package.json";
const DEFAULT_ENTRY: &str = "index.js";

/// The one manifest field we care about
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default, deserialize_with = "lenient_string")]
    main: Option<String>,
}

/// Non-string `main` values are treated as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(ToString::to_string))
}

impl Manifest {
    /// Malformed manifests behave like manifests without `main`
    fn parse(content: &[u8]) -> Self {
        serde_json::from_slice(content).unwrap_or_default()
    }

    fn entry_file(&self) -> &str {
        match self.main.as_deref().map(str::trim) {
            Some(main) if !main.is_empty() => main,
            _ => DEFAULT_ENTRY,
        }
    }
}

/// Successful top-level resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Context to hand to the client
    pub context: ModuleContext,
    /// Canonical path of the entry file, inside the trusted root
    pub entry_path: PathBuf,
}

/// Resolve `name` to its entry file under the canonical trusted `root`
pub async fn resolve_module(root: &Path, name: &str) -> Result<ResolvedModule, ResolveError> {
    let not_found = |detail: String| ResolveError::ModuleNotFound {
        name: name.to_string(),
        detail,
    };

    // nothing is opened until the module directory is known to sit inside the root
    let module_dir = canonical_within(root, &root.join(name))
        .await
        .filter(|dir| dir != root)
        .ok_or_else(|| {
            not_found(format!(
                "{} is not a directory inside the trusted root",
                root.join(name).display()
            ))
        })?;

    let manifest_path = match canonical_within(root, &module_dir.join(MANIFEST_FILE)).await {
        Some(path) if is_file(&path).await => path,
        _ => {
            return Err(not_found(format!(
                "no manifest at {}",
                module_dir.join(MANIFEST_FILE).display()
            )));
        }
    };
    let content = fs::read(&manifest_path)
        .await
        .map_err(|source| ResolveError::IoFailure {
            path: manifest_path.clone(),
            source,
        })?;

    let manifest = Manifest::parse(&content);
    let entry_file = manifest.entry_file().to_string();
    let candidate = module_dir.join(entry_file.trim_start_matches('/'));

    let entry_path = match canonical_within(root, &candidate).await {
        Some(path) if is_file(&path).await => path,
        _ => {
            return Err(ResolveError::EntryFileNotFound {
                entry_file,
                path: candidate,
            });
        }
    };

    Ok(ResolvedModule {
        context: ModuleContext::new(name, entry_file),
        entry_path,
    })
}

/// Canonicalize `path`, keeping it only if it stays inside `root`
pub(super) async fn canonical_within(root: &Path, path: &Path) -> Option<PathBuf> {
    let canonical = fs::canonicalize(path).await.ok()?;
    canonical.starts_with(root).then_some(canonical)
}

pub(super) async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("node_modules");
        stdfs::create_dir_all(root.join("lit")).unwrap();
        stdfs::write(root.join("lit/package.json"), r#"{"main":"index.js"}"#).unwrap();
        stdfs::write(root.join("lit/index.js"), "import './utils.js';\n").unwrap();
        let root = root.canonicalize().unwrap();
        (dir, root)
    }

    #[test]
    fn test_manifest_entry_file() {
        assert_eq!(Manifest::parse(br#"{"main":"dist/app.js"}"#).entry_file(), "dist/app.js");
        assert_eq!(Manifest::parse(br#"{"name":"x"}"#).entry_file(), "index.js");
        assert_eq!(Manifest::parse(br#"{"main":""}"#).entry_file(), "index.js");
        assert_eq!(Manifest::parse(br#"{"main":42}"#).entry_file(), "index.js");
        assert_eq!(Manifest::parse(b"not json").entry_file(), "index.js");
        assert_eq!(
            Manifest::parse(br#"{"main":"lib/main.js","module":"esm/main.js"}"#).entry_file(),
            "lib/main.js"
        );
    }

    #[tokio::test]
    async fn test_resolves_main() {
        let (_dir, root) = setup();
        let resolved = resolve_module(&root, "lit").await.unwrap();
        assert_eq!(resolved.context, ModuleContext::new("lit", "index.js"));
        assert_eq!(resolved.entry_path, root.join("lit/index.js"));
    }

    #[tokio::test]
    async fn test_nested_main() {
        let (_dir, root) = setup();
        stdfs::create_dir_all(root.join("preact/dist")).unwrap();
        stdfs::write(root.join("preact/package.json"), r#"{"main":"./dist/preact.js"}"#).unwrap();
        stdfs::write(root.join("preact/dist/preact.js"), "export {};").unwrap();

        let resolved = resolve_module(&root, "preact").await.unwrap();
        assert_eq!(resolved.context.entry_file, "./dist/preact.js");
        assert_eq!(resolved.entry_path, root.join("preact/dist/preact.js"));
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let (_dir, root) = setup();
        let err = resolve_module(&root, "doesnotexist").await.unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
        assert_eq!(err.to_string(), "Module not found: doesnotexist");

        // directory without a manifest is still not a module
        stdfs::create_dir(root.join("bare")).unwrap();
        let err = resolve_module(&root, "bare").await.unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_default_entry_missing() {
        let (_dir, root) = setup();
        stdfs::create_dir(root.join("noindex")).unwrap();
        stdfs::write(root.join("noindex/package.json"), r#"{"name":"noindex"}"#).unwrap();

        let err = resolve_module(&root, "noindex").await.unwrap_err();
        assert!(matches!(err, ResolveError::EntryFileNotFound { .. }));
        assert_eq!(err.to_string(), "Main file not found: index.js");
    }

    #[tokio::test]
    async fn test_main_pointing_at_directory() {
        let (_dir, root) = setup();
        stdfs::create_dir_all(root.join("dirmain/lib")).unwrap();
        stdfs::write(root.join("dirmain/package.json"), r#"{"main":"lib"}"#).unwrap();

        let err = resolve_module(&root, "dirmain").await.unwrap_err();
        assert_eq!(err.to_string(), "Main file not found: lib");
    }

    #[tokio::test]
    async fn test_main_cannot_escape_root() {
        let (dir, root) = setup();
        stdfs::write(dir.path().join("secret.js"), "secret").unwrap();
        stdfs::create_dir(root.join("evil")).unwrap();
        stdfs::write(root.join("evil/package.json"), r#"{"main":"../../secret.js"}"#).unwrap();

        let err = resolve_module(&root, "evil").await.unwrap_err();
        assert!(matches!(err, ResolveError::EntryFileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_module_name_cannot_escape_root() {
        let (dir, root) = setup();
        stdfs::write(dir.path().join("package.json"), r#"{"main":"secret.js"}"#).unwrap();
        stdfs::write(dir.path().join("secret.js"), "secret").unwrap();

        let err = resolve_module(&root, "..").await.unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_manifest_uses_default_entry() {
        let (_dir, root) = setup();
        stdfs::create_dir(root.join("binary")).unwrap();
        stdfs::write(root.join("binary/package.json"), [0xFF, 0xFE]).unwrap();
        stdfs::write(root.join("binary/index.js"), "export {};").unwrap();

        let resolved = resolve_module(&root, "binary").await.unwrap();
        assert_eq!(resolved.context, ModuleContext::new("binary", "index.js"));
        assert_eq!(resolved.entry_path, root.join("binary/index.js"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_module_outside_root_never_read() {
        let (dir, root) = setup();
        let outside = dir.path().join("outside");
        stdfs::create_dir(&outside).unwrap();
        stdfs::write(outside.join("package.json"), [0xFF, 0xFE]).unwrap();
        stdfs::write(outside.join("index.js"), "secret").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("evil")).unwrap();

        let err = resolve_module(&root, "evil").await.unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Module not found: evil");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_manifest_outside_root_rejected() {
        let (dir, root) = setup();
        stdfs::write(dir.path().join("package.json"), r#"{"main":"index.js"}"#).unwrap();
        stdfs::create_dir(root.join("linked")).unwrap();
        stdfs::write(root.join("linked/index.js"), "export {};").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("package.json"),
            root.join("linked/package.json"),
        )
        .unwrap();

        let err = resolve_module(&root, "linked").await.unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
    }
}
