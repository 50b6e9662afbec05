//! HTTP response building module
//!
//! No caching, range or compression headers: every success carries the
//! full file and every failure a short plain-text body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, SERVER, SET_COOKIE};
use hyper::Response;

use crate::logger::EventLog;

/// Build 200 response carrying a whole file
pub fn build_file_response(
    log: &EventLog,
    data: Bytes,
    content_type: &str,
    server_name: &str,
    set_cookie: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(200)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, data.len())
        .header(SERVER, server_name);

    if let Some(cookie) = set_cookie {
        builder = builder.header(SET_COOKIE, cookie);
    }

    builder.body(Full::new(data)).unwrap_or_else(|e| {
        log_build_error(log, "200", &e);
        plain_text(500, "Internal server error.")
    })
}

/// Build plain-text error response (404 / 500)
pub fn build_error_response(
    log: &EventLog,
    status: u16,
    message: &str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .header(SERVER, server_name)
        .body(Full::new(Bytes::from(message.to_owned())))
        .unwrap_or_else(|e| {
            log_build_error(log, &status.to_string(), &e);
            plain_text(status, message)
        })
}

/// Minimal response that cannot fail to build
fn plain_text(status: u16, message: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(message.to_owned())));
    if let Ok(status) = hyper::StatusCode::from_u16(status) {
        *response.status_mut() = status;
    }
    response
}

/// Log response build error
fn log_build_error(log: &EventLog, status: &str, error: &hyper::http::Error) {
    log.log(&format!("[ERROR] Failed to build {status} response: {error}"));
}
