// API module entry
// REST endpoints over the skill collection

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;

use crate::config::AppState;
use crate::logger;

use response::{error_response, not_found};

/// Prefix for every API path
pub const API_PREFIX: &str = "/api";

const SKILLS_PATH: &str = "/api/skills";
const COLLECTION_METHODS: &str = "GET, POST, OPTIONS";
const ITEM_METHODS: &str = "GET, PUT, DELETE, OPTIONS";

/// Resolved API endpoint
#[derive(Debug, PartialEq, Eq)]
enum ApiRoute<'a> {
    /// `/api/skills`
    Collection,
    /// `/api/skills/{name}`, still percent-encoded
    Skill(&'a str),
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let response = match resolve(&path) {
        Some(ApiRoute::Collection) => match &method {
            &Method::GET => handlers::list_skills(state).await?,
            &Method::POST => handlers::create_skill(req, state).await?,
            _ => response::method_not_allowed(COLLECTION_METHODS),
        },
        Some(ApiRoute::Skill(raw)) => match urlencoding::decode(raw) {
            Ok(name) => match &method {
                &Method::GET => handlers::get_skill(&name, state).await?,
                &Method::PUT => handlers::update_skill(req, &name, state).await?,
                &Method::DELETE => handlers::delete_skill(&name, state).await?,
                _ => response::method_not_allowed(ITEM_METHODS),
            },
            Err(_) => error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid skill name '{raw}'"),
            ),
        },
        None => not_found(),
    };

    logger::log_api_request(method.as_str(), &path, response.status().as_u16());
    Ok(response)
}

fn resolve(path: &str) -> Option<ApiRoute<'_>> {
    let rest = path.strip_prefix(SKILLS_PATH)?;
    if rest.is_empty() || rest == "/" {
        return Some(ApiRoute::Collection);
    }

    let segment = rest.strip_prefix('/')?;
    if segment.contains('/') {
        None
    } else {
        Some(ApiRoute::Skill(segment))
    }
}
