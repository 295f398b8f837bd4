// Skill endpoint handlers

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use super::response::{error_response, json_response, store_error_response};
use super::types::{CreateSkillRequest, SkillMessage, UpdateSkillRequest};
use crate::config::AppState;
use crate::http;
use crate::logger;

/// Reasons a JSON request body could not be used
enum BodyError {
    TooLarge,
    Unreadable,
    Invalid(String),
}

impl BodyError {
    fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::TooLarge => http::build_413_response(),
            Self::Unreadable => {
                error_response(StatusCode::BAD_REQUEST, "Failed to read request body")
            }
            Self::Invalid(message) => error_response(StatusCode::UNPROCESSABLE_ENTITY, &message),
        }
    }
}

/// `GET /api/skills`
pub async fn list_skills(state: &AppState) -> Result<Response<Full<Bytes>>, Infallible> {
    match state.store.list().await {
        Ok(skills) => json_response(StatusCode::OK, &skills),
        Err(e) => Ok(store_error_response(&e)),
    }
}

/// `GET /api/skills/{name}`
pub async fn get_skill(name: &str, state: &AppState) -> Result<Response<Full<Bytes>>, Infallible> {
    match state.store.get(name).await {
        Ok(skill) => json_response(StatusCode::OK, &skill),
        Err(e) => Ok(store_error_response(&e)),
    }
}

/// `POST /api/skills`
pub async fn create_skill<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: CreateSkillRequest = match read_json(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(e) => return Ok(e.into_response()),
    };

    match state.store.create(&body.name, &body.content).await {
        Ok(name) => json_response(
            StatusCode::OK,
            &SkillMessage::new(name, "Skill created successfully"),
        ),
        Err(e) => Ok(store_error_response(&e)),
    }
}

/// `PUT /api/skills/{name}`
pub async fn update_skill<B>(
    req: Request<B>,
    name: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: UpdateSkillRequest = match read_json(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(e) => return Ok(e.into_response()),
    };

    match state.store.update(name, &body.content).await {
        Ok(()) => json_response(
            StatusCode::OK,
            &SkillMessage::new(name, "Skill updated successfully"),
        ),
        Err(e) => Ok(store_error_response(&e)),
    }
}

/// `DELETE /api/skills/{name}`
pub async fn delete_skill(
    name: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match state.store.delete(name).await {
        Ok(()) => json_response(
            StatusCode::OK,
            &SkillMessage::new(name, "Skill deleted successfully"),
        ),
        Err(e) => Ok(store_error_response(&e)),
    }
}

/// Collect at most `limit` bytes of the body and decode them as JSON
async fn read_json<B, T>(req: Request<B>, limit: u64) -> Result<T, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeds {limit} bytes"));
            return Err(BodyError::TooLarge);
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(BodyError::Unreadable);
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| BodyError::Invalid(format!("Invalid request body: {e}")))
}
