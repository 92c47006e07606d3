//! cats-server
//!
//! A small HTTP service exposing the `cats` resource over a hyper/tokio
//! stack, with an explicit routing table, layered configuration and
//! access logging.

pub mod cats;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{Result, ServerError};
