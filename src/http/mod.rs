//! HTTP protocol layer module
//!
//! Content-type lookup and response builders, independent of how a file
//! was resolved.

pub mod mime;
pub mod response;

pub use response::{build_error_response, build_file_response};
