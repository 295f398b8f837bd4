//! Request handler module
//!
//! Responsible for request routing dispatch: the skill API, health checks and
//! the optional web UI.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
