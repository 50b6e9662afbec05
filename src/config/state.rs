// Application state module
// Immutable per-process state shared by every connection

use std::io;
use std::path::PathBuf;

use super::types::Config;
use crate::logger::EventLog;
use crate::resolve::ContextCarrier;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonicalized trusted root
    pub root: PathBuf,
    /// Canonicalized document root, if configured
    pub public_dir: Option<PathBuf>,
    pub carrier: ContextCarrier,
    pub log: EventLog,
}

impl AppState {
    /// Build state from configuration, opening the configured event log.
    ///
    /// Fails if the trusted root (or public dir) cannot be canonicalized
    /// or the log file cannot be opened.
    pub fn new(config: Config) -> io::Result<Self> {
        let log = EventLog::open(config.logging.file.as_deref())?;
        Self::with_log(config, log)
    }

    /// Build state with an explicit event sink
    pub fn with_log(config: Config, log: EventLog) -> io::Result<Self> {
        let root = canonical_dir(&config.resolver.root, "trusted root")?;
        let public_dir = config
            .resolver
            .public_dir
            .as_deref()
            .map(|dir| canonical_dir(dir, "public dir"))
            .transpose()?;
        let carrier = ContextCarrier::new(&config.resolver.context_cookie);

        log.log(&format!(
            "Handler initialized (root: {}, cookie: {})",
            root.display(),
            carrier.cookie_name()
        ));

        Ok(Self {
            config,
            root,
            public_dir,
            carrier,
            log,
        })
    }
}

fn canonical_dir(path: &str, what: &str) -> io::Result<PathBuf> {
    let canonical = std::fs::canonicalize(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{what} '{path}' is not accessible: {e}")))?;
    if !canonical.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} '{path}' is not a directory"),
        ));
    }
    Ok(canonical)
}
