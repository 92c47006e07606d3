// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::{AtomicUsize, Ordering};

use hyper::header::HeaderValue;

use super::types::{Config, HttpConfig};
use crate::error::{Result, ServerError};
use crate::routing::{self, RouteTable};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Routing table, built once at startup
    pub routes: RouteTable,

    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Create `AppState`, validating header settings and building the
    /// routing table from the routes config
    pub fn new(config: Config) -> Result<Self> {
        validate_headers(&config.http)?;
        let routes = routing::build_route_table(&config.routes)?;

        Ok(Self {
            config,
            routes,
            active_connections: AtomicUsize::new(0),
        })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}

/// Configured values sent verbatim as response headers must be valid there
fn validate_headers(http: &HttpConfig) -> Result<()> {
    let checks = [
        ("http.default_content_type", &http.default_content_type),
        ("http.server_name", &http.server_name),
    ];
    for (key, value) in checks {
        if HeaderValue::from_str(value).is_err() {
            return Err(ServerError::InvalidHeaderValue {
                key,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
