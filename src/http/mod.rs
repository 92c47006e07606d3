//! HTTP protocol layer module
//!
//! Response construction shared by the dispatcher, the resources and the
//! health probes.

pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_400_response, build_404_response, build_405_response,
    build_413_response, build_health_response, build_options_response, build_text_response,
    without_body,
};
