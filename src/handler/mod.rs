//! Request handler module
//!
//! Entry point for every request: public files first, then module and
//! relative-import resolution, then the file itself.

pub mod files;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
