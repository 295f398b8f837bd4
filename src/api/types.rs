// API request/response types

use serde::{Deserialize, Serialize};

/// Body of `POST /api/skills`
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub content: String,
}

/// Body of `PUT /api/skills/{name}`
#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub content: String,
}

/// Acknowledgement returned by mutating endpoints
#[derive(Debug, Serialize)]
pub struct SkillMessage {
    pub name: String,
    pub message: &'static str,
}

impl SkillMessage {
    pub fn new(name: impl Into<String>, message: &'static str) -> Self {
        Self {
            name: name.into(),
            message,
        }
    }
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorDetail<'a> {
    pub detail: &'a str,
}
