//! Request routing dispatch module
//!
//! Classifies each request, runs the matching resolver and serves the
//! result. Every failure branch writes exactly one event and one
//! plain-text response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::REFERER;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler::{files, static_files};
use crate::http;
use crate::resolve::{self, ModuleContext, RequestKind, ResolveError};

/// Main entry point for HTTP request handling.
///
/// The request body is never read; method is not checked.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path();
    let referer = req.headers().get(REFERER).and_then(|v| v.to_str().ok());

    state.log.log(&format!(
        "Request: {} {} (referer: {})",
        req.method(),
        req.uri(),
        referer.unwrap_or("-")
    ));

    if let Some(public_dir) = &state.public_dir {
        if let Some(file) = static_files::find_public_file(public_dir, path).await {
            return Ok(serve(&state, &file, None).await);
        }
    }

    // a page from the public directory loads modules, it is not one
    let referer = match (&state.public_dir, referer) {
        (Some(public_dir), Some(value)) => {
            if static_files::is_public_referer(public_dir, value).await {
                None
            } else {
                referer
            }
        }
        _ => referer,
    };

    let response = match resolve::classify(path, referer) {
        RequestKind::Module { name } => serve_module(&state, name).await,
        RequestKind::RelativeImport {
            request_path,
            referer_path,
        } => {
            let context = state.carrier.load(req.headers());
            serve_relative_import(&state, context, request_path, &referer_path).await
        }
        RequestKind::Unclassifiable => fail(
            &state,
            &ResolveError::UnclassifiableRequest {
                path: path.to_string(),
            },
        ),
    };
    Ok(response)
}

/// Top-level `/<name>.js`: resolve the entry file and issue a context
async fn serve_module(state: &AppState, name: &str) -> Response<Full<Bytes>> {
    match resolve::resolve_module(&state.root, name).await {
        Ok(resolved) => {
            state.log.log(&format!(
                "Module {name} resolved to {} (context: {})",
                resolved.entry_path.display(),
                resolved.context.to_token()
            ));
            let cookie = state.carrier.store(&resolved.context);
            serve(state, &resolved.entry_path, Some(&cookie)).await
        }
        Err(err) => fail(state, &err),
    }
}

/// Relative import: recover the context and resolve inside the root
async fn serve_relative_import(
    state: &AppState,
    context: Option<ModuleContext>,
    request_path: &str,
    referer_path: &str,
) -> Response<Full<Bytes>> {
    match resolve::resolve_relative(&state.root, request_path, referer_path, context.as_ref())
        .await
    {
        Ok(resolved) => {
            state.log.log(&format!(
                "Resolved {request_path} for {referer_path} to {}",
                resolved.display()
            ));
            serve(state, &resolved, None).await
        }
        Err(err) => fail(state, &err),
    }
}

/// Stream a validated file, optionally setting the context cookie
async fn serve(state: &AppState, path: &Path, set_cookie: Option<&str>) -> Response<Full<Bytes>> {
    match files::load(path).await {
        Ok(file) => {
            state.log.log(&format!(
                "Served {} ({} bytes, {})",
                path.display(),
                file.data.len(),
                file.content_type
            ));
            http::build_file_response(
                &state.log,
                file.data,
                file.content_type,
                &state.config.http.server_name,
                set_cookie,
            )
        }
        Err(err) => fail(state, &err),
    }
}

fn fail(state: &AppState, err: &ResolveError) -> Response<Full<Bytes>> {
    state.log.log(&err.log_detail());
    http::build_error_response(
        &state.log,
        err.status(),
        &err.to_string(),
        &state.config.http.server_name,
    )
}
