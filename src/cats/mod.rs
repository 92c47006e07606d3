//! The `cats` resource
//!
//! Two stateless operations mounted at `{prefix}/cats`:
//!
//! | Method | Response body                |
//! |--------|------------------------------|
//! | POST   | `This action adds a new cat` |
//! | GET    | `This Find All Cats`         |
//!
//! Nothing is stored. The create payload is read and discarded.

mod payload;

pub use payload::CreateCatPayload;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::error::Result;
use crate::handler::RequestContext;
use crate::http;
use crate::logger::{self, Level};
use crate::routing::{join_path, RouteTable};

/// Path segment the resource is mounted on
pub const RESOURCE: &str = "cats";

pub const CREATE_MESSAGE: &str = "This action adds a new cat";
pub const FIND_ALL_MESSAGE: &str = "This Find All Cats";

/// Register the resource's routes under `prefix`
pub fn register(table: &mut RouteTable, prefix: &str) -> Result<()> {
    let path = join_path(prefix, RESOURCE);
    table
        .route(Method::POST, &path, create)?
        .route(Method::GET, &path, find_all)?;
    Ok(())
}

/// `POST /cats`. Accepts any body without validation.
pub fn create(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    if let Some(summary) = payload_summary(ctx.body, logger::enabled(Level::Debug)) {
        logger::log_debug(&format!("[cats] create, payload: {summary}"));
    }
    http::build_text_response(CREATE_MESSAGE, ctx.http)
}

/// The body is only parsed when the summary will be logged
fn payload_summary(body: &[u8], debug: bool) -> Option<String> {
    debug.then(|| CreateCatPayload::read(body).describe())
}

/// `GET /cats`. Query parameters are ignored.
pub fn find_all(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_text_response(FIND_ALL_MESSAGE, ctx.http)
}
