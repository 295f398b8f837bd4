//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from skill logic.

pub mod mime;
pub mod response;

pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_413_response,
    build_file_response, build_health_response, build_options_response,
};

/// Methods accepted anywhere on the server, advertised in preflight answers
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
