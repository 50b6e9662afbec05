//! Logger module
//!
//! The event log is the only shared mutable resource in the server.
//! Every resolution step writes one line to it; the helpers here cover
//! the lifecycle events that happen outside a request.

pub mod writer;

pub use writer::EventLog;

use crate::config::AppState;
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let log = &state.log;
    log.log("======================================");
    log.log("Module dev server started");
    log.log(&format!("Listening on: http://{addr}"));
    log.log(&format!("Trusted root: {}", state.root.display()));
    log.log(&format!("Context cookie: {}", state.carrier.cookie_name()));
    if let Some(public) = &state.public_dir {
        log.log(&format!("Public dir: {}", public.display()));
    }
    if let Some(workers) = state.config.server.workers {
        log.log(&format!("Worker threads: {workers}"));
    }
    log.log(&format!("Event log: {}", log.destination()));
    log.log("======================================");
}

pub fn log_connection_error(log: &EventLog, err: &impl std::fmt::Debug) {
    log.log(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_warning(log: &EventLog, message: &str) {
    log.log(&format!("[WARN] {message}"));
}

pub fn log_shutdown(log: &EventLog, reason: &str) {
    log.log(&format!("Shutdown requested ({reason}), no longer accepting connections"));
}
