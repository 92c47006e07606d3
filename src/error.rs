//! Server error types
//!
//! Startup and wiring failures. Request-level problems never surface here:
//! they are turned into HTTP responses by the dispatcher.

use hyper::Method;
use std::net::AddrParseError;
use thiserror::Error;

/// Errors raised while configuring, wiring or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// `host:port` did not parse as a socket address
    #[error("invalid listen address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    /// Socket, file or runtime I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The same method and path were registered twice
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },

    /// Route paths must be absolute
    #[error("invalid route path `{0}`: must start with '/'")]
    InvalidRoutePath(String),

    /// A configured value that is sent as a response header is not a valid header value
    #[error("invalid header value for `{key}`: {value:?}")]
    InvalidHeaderValue { key: &'static str, value: String },
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;
