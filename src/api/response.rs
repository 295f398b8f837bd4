// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;

use super::types::ErrorDetail;
use crate::logger;
use crate::skills::StoreError;

const INTERNAL_ERROR_BODY: &str = r#"{"detail":"Internal server error"}"#;

/// Build JSON response
#[allow(clippy::unnecessary_wraps)]
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Ok(raw_json(StatusCode::INTERNAL_SERVER_ERROR, Bytes::from(INTERNAL_ERROR_BODY)));
        }
    };

    Ok(raw_json(status, Bytes::from(json)))
}

/// Build `{"detail": ...}` error response
pub fn error_response(status: StatusCode, detail: &str) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&ErrorDetail { detail })
        .map_or_else(|_| Bytes::from(INTERNAL_ERROR_BODY), Bytes::from);
    raw_json(status, body)
}

/// Map a store failure to its HTTP status.
///
/// Filesystem errors are logged in full and answered with a generic 500.
pub fn store_error_response(err: &StoreError) -> Response<Full<Bytes>> {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists(_) | StoreError::NameRequired | StoreError::InvalidName(_) => {
            StatusCode::BAD_REQUEST
        }
        StoreError::Io { .. } => {
            logger::log_error(&err.to_string());
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };
    error_response(status, &err.to_string())
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// 405 Method Not Allowed response
pub fn method_not_allowed(allow: &'static str) -> Response<Full<Bytes>> {
    let mut resp = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    resp.headers_mut()
        .insert(hyper::header::ALLOW, hyper::header::HeaderValue::from_static(allow));
    resp
}

fn raw_json(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}
