use serde::{Deserialize, Serialize};

use trackline_core::{ProjectId, UserId};
use trackline_store::Page;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub assigned_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    /// Optional on the wire so its absence maps to a domain error rather
    /// than a 422 from deserialization.
    pub project_id: Option<ProjectId>,
}

/// `?skip=&limit=` pagination query.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl From<ListQuery> for Page {
    /// Negative values are clamped to zero here so both store backends see
    /// valid LIMIT/OFFSET windows.
    fn from(query: ListQuery) -> Self {
        Page {
            skip: query.skip.max(0),
            limit: query.limit.max(0),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expired_minutes: i64,
}
