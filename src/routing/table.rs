//! Route table module
//!
//! Explicit `(method, path) -> handler` mapping. Built once at startup and
//! only read afterwards.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, ServerError};
use crate::handler::RequestContext;
use crate::logger;

/// A route handler. Handlers are synchronous and stateless.
pub type Handler = fn(&RequestContext<'_>) -> Response<Full<Bytes>>;

/// Outcome of looking up a request in the table
pub enum RouteMatch {
    Found(Handler),
    /// The path exists but not for this method; carries what is allowed
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Mapping from normalized path to the handlers registered on it
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, Vec<(Method, Handler)>>,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found(..)"),
            Self::MethodNotAllowed(allowed) => {
                f.debug_tuple("MethodNotAllowed").field(allowed).finish()
            }
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.routes.iter().map(|(path, methods)| {
                let methods: Vec<&Method> = methods.iter().map(|(m, _)| m).collect();
                (path, methods)
            }))
            .finish()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `path`
    pub fn route(&mut self, method: Method, path: &str, handler: Handler) -> Result<&mut Self> {
        if !path.starts_with('/') {
            return Err(ServerError::InvalidRoutePath(path.to_string()));
        }
        let path = normalize_path(path);
        let methods = self.routes.entry(path.to_string()).or_default();
        if methods.iter().any(|(m, _)| *m == method) {
            return Err(ServerError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }

        logger::log_route_registered(&method, path);
        methods.push((method, handler));
        Ok(self)
    }

    /// Look up the handler for a request
    ///
    /// `HEAD` falls back to the `GET` handler of the same path.
    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch {
        let Some(methods) = self.routes.get(normalize_path(path)) else {
            return RouteMatch::NotFound;
        };

        let find = |wanted: &Method| {
            methods
                .iter()
                .find(|(m, _)| m == wanted)
                .map(|(_, handler)| *handler)
        };

        let handler = find(method).or_else(|| {
            if *method == Method::HEAD {
                find(&Method::GET)
            } else {
                None
            }
        });

        match handler {
            Some(handler) => RouteMatch::Found(handler),
            None => RouteMatch::MethodNotAllowed(allowed_for(methods)),
        }
    }

    /// Methods accepted on `path`, or `None` for an unknown path
    pub fn allowed_methods(&self, path: &str) -> Option<Vec<Method>> {
        self.routes.get(normalize_path(path)).map(|m| allowed_for(m))
    }

    /// Number of registered `(method, path)` pairs
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Registration order, then implied `HEAD` (after `GET`) and `OPTIONS`
fn allowed_for(methods: &[(Method, Handler)]) -> Vec<Method> {
    let registered = |wanted: &Method| methods.iter().any(|(m, _)| m == wanted);

    let mut allowed = Vec::with_capacity(methods.len() + 2);
    for (method, _) in methods {
        allowed.push(method.clone());
        if *method == Method::GET && !registered(&Method::HEAD) {
            allowed.push(Method::HEAD);
        }
    }
    if !registered(&Method::OPTIONS) {
        allowed.push(Method::OPTIONS);
    }
    allowed
}

/// Format methods for an `Allow` header
pub fn allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ignore a single trailing slash, except on the root path
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Join a mount prefix and a resource segment into an absolute path
///
/// `("", "cats")` gives `/cats`; `("/api/", "/cats")` gives `/api/cats`.
pub fn join_path(prefix: &str, segment: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let segment = segment.trim_matches('/');
    match (prefix.is_empty(), segment.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{segment}"),
        (false, true) => format!("/{prefix}"),
        (false, false) => format!("/{prefix}/{segment}"),
    }
}
