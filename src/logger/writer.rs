//! Log writer module
//!
//! Appends timestamped event lines to stdout or a file.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Append to file
    File { path: PathBuf, file: Mutex<File> },
}

/// Thread-safe, append-only event sink
pub struct EventLog {
    target: LogTarget,
}

impl EventLog {
    /// Log to stdout
    pub const fn stdout() -> Self {
        Self {
            target: LogTarget::Stdout,
        }
    }

    /// Log to a file opened in append mode, creating parent directories
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = open_log_file(path)?;
        Ok(Self {
            target: LogTarget::File {
                path: path.to_path_buf(),
                file: Mutex::new(file),
            },
        })
    }

    /// Build from the optional configured path
    pub fn open(path: Option<&str>) -> io::Result<Self> {
        path.map_or_else(|| Ok(Self::stdout()), Self::file)
    }

    /// Human-readable description of where events go
    pub fn destination(&self) -> String {
        match &self.target {
            LogTarget::Stdout => "stdout".to_string(),
            LogTarget::File { path, .. } => path.display().to_string(),
        }
    }

    /// Append `[<timestamp>] <message>` as a single line.
    ///
    /// Never fails: sink errors go to stderr and the caller carries on.
    pub fn log(&self, message: &str) {
        let line = format_line(message);
        match &self.target {
            LogTarget::Stdout => {
                let mut out = io::stdout().lock();
                if let Err(e) = out.write_all(line.as_bytes()) {
                    report_sink_error("stdout", &e);
                }
            }
            LogTarget::File { path, file } => {
                let Ok(mut f) = file.lock() else {
                    report_sink_error(&path.display().to_string(), &"lock poisoned");
                    return;
                };
                // one write per line so O_APPEND keeps concurrent lines whole
                if let Err(e) = f.write_all(line.as_bytes()) {
                    report_sink_error(&path.display().to_string(), &e);
                }
            }
        }
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("destination", &self.destination())
            .finish()
    }
}

fn format_line(message: &str) -> String {
    format!("[{}] {message}\n", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn report_sink_error(destination: &str, err: &dyn std::fmt::Display) {
    eprintln!("[LOGGER] Failed to append event to {destination}: {err}");
}
