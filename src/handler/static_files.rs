//! Static file serving module
//!
//! Serves the built web UI from a configured directory, with the app shell
//! as fallback for client-side routes.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";
const UI_METHODS: &str = "GET, HEAD, OPTIONS";

/// Serve a web UI asset, or 404 when no UI directory is configured
pub async fn serve_ui<B>(req: &Request<B>, ui_dir: Option<&Path>) -> Response<Full<Bytes>> {
    let Some(dir) = ui_dir else {
        return http::build_404_response();
    };

    let is_head = req.method() == Method::HEAD;
    if req.method() != Method::GET && !is_head {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        return http::build_405_response(UI_METHODS);
    }

    let Some(file) = resolve_ui_file(dir, req.uri().path()).await else {
        return http::build_404_response();
    };

    match fs::read(&file).await {
        Ok(data) => {
            let content_type =
                mime::get_content_type(file.extension().and_then(std::ffi::OsStr::to_str));
            http::build_file_response(Bytes::from(data), content_type, is_head)
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read '{}': {e}", file.display()));
            http::build_404_response()
        }
    }
}

/// Map a request path to a file inside `dir`.
///
/// Paths with `..` or absolute components are refused, and the final file
/// must resolve inside `dir` after following symlinks.
async fn resolve_ui_file(dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    let mut candidate = dir.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => candidate.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if is_file(&candidate).await {
        return contained(dir, &candidate).await;
    }

    let index = candidate.join(INDEX_FILE);
    if is_dir(&candidate).await && is_file(&index).await {
        return contained(dir, &index).await;
    }

    // Client-side routes have no extension and get the app shell
    let shell = dir.join(INDEX_FILE);
    if relative.extension().is_none() && is_file(&shell).await {
        return contained(dir, &shell).await;
    }

    None
}

async fn contained(dir: &Path, file: &Path) -> Option<PathBuf> {
    let root = match fs::canonicalize(dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "UI directory not found or inaccessible '{}': {e}",
                dir.display()
            ));
            return None;
        }
    };
    let resolved = fs::canonicalize(file).await.ok()?;
    if resolved.starts_with(&root) {
        Some(resolved)
    } else {
        logger::log_warning(&format!(
            "Refusing to serve '{}' outside the UI directory",
            resolved.display()
        ));
        None
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}
