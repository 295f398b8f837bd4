//! Shared helpers for request-level tests

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use tempfile::TempDir;

use crate::config::{AppState, Config};

/// State backed by `<tmp>/skills` with a small body limit
pub fn test_state(tmp: &TempDir) -> AppState {
    let mut cfg = Config::defaults().unwrap();
    cfg.storage.skills_dir = tmp.path().join("skills");
    cfg.http.max_body_size = 256;
    cfg.logging.access_log = false;
    AppState::new(cfg)
}

pub fn request(method: Method, uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

pub async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
    resp.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}
