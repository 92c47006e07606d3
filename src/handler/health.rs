//! Health probe handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::RequestContext;
use crate::http;

/// Liveness: the process is up and serving
pub fn liveness(_ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_health_response("ok")
}

/// Readiness: there are no external dependencies, so ready once serving
pub fn readiness(_ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_health_response("ok")
}
