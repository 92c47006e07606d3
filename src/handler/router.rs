//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for size guards,
//! route lookup, dispatching and access logging.

use crate::config::{AppState, HttpConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{allow_header, RouteMatch};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a route handler gets to see
///
/// Method and path are settled by the routing table and the query string
/// is not part of any operation, so only the body and response settings
/// are passed on.
pub struct RequestContext<'a> {
    /// Fully collected request body, capped at `http.max_body_size`
    pub body: &'a Bytes,
    pub http: &'a HttpConfig,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    logger::log_headers_count(parts.headers.len(), state.config.logging.show_headers);

    let mut response = dispatch(&parts, body, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);
    if parts.method == Method::HEAD {
        response = http::without_body(response);
    }

    if state.access_log_enabled() {
        log_access(
            &parts,
            &response,
            peer_addr,
            started,
            &state.config.logging.access_log_format,
        );
    }

    Ok(response)
}

/// Guard, resolve and run the route for one request
async fn dispatch<B>(parts: &Parts, body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let http_config = &state.config.http;
    let path = parts.uri.path();

    // 1. Reject declared oversize bodies before reading anything
    if let Some(resp) = check_body_size(&parts.headers, http_config.max_body_size) {
        return resp;
    }

    // 2. Route lookup
    let handler = match state.routes.resolve(&parts.method, path) {
        RouteMatch::Found(handler) => handler,
        RouteMatch::MethodNotAllowed(allowed) => {
            let allow = allow_header(&allowed);
            if parts.method == Method::OPTIONS {
                return http::build_options_response(&allow, http_config.enable_cors);
            }
            logger::log_warning(&format!("Method not allowed: {} {path}", parts.method));
            return http::build_405_response(&allow);
        }
        RouteMatch::NotFound => return http::build_404_response(),
    };

    // 3. Collect the body under the size cap
    let body = match read_body(body, http_config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(resp) => return resp,
    };

    // 4. Run the handler
    let ctx = RequestContext {
        body: &body,
        http: http_config,
    };
    handler(&ctx)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Read the whole body, failing with a ready-made response
///
/// Bodies without a usable Content-Length (chunked) are capped here.
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    let header = |name: hyper::header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(hyper::header::REFERER);
    entry.user_agent = header(hyper::header::USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, format);
}
