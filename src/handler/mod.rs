//! Request handler module
//!
//! Entry point for every HTTP request: guards, route dispatch and access
//! logging. Resource logic lives with the resources.

pub mod health;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
