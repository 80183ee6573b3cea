use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use trackline_core::Error;

/// Translate a domain error into the wire shape `{"detail": "..."}`.
pub fn error_response(err: Error) -> axum::response::Response {
    let (status, detail) = match err {
        Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
        Error::WrongPassword => (StatusCode::BAD_REQUEST, "Wrong password"),
        Error::UserExists => (StatusCode::BAD_REQUEST, "User already exist"),
        Error::UserNotAdmin => (StatusCode::BAD_REQUEST, "User has no admin privileges"),
        Error::InvalidToken => (StatusCode::FORBIDDEN, "Could not validate credentials"),
        Error::ProjectNotFound => (StatusCode::NOT_FOUND, "Project not found"),
        Error::IssueNotFound => (StatusCode::NOT_FOUND, "Issue not found"),
        Error::ProjectRequired => (StatusCode::NOT_FOUND, "Project is required"),
        Error::PermissionDenied => (StatusCode::BAD_REQUEST, "Not enough permissions"),
        Error::Storage(msg) => {
            tracing::error!("storage failure: {msg}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    json_detail(status, detail)
}

pub fn json_detail(status: StatusCode, detail: &str) -> axum::response::Response {
    (status, axum::Json(json!({ "detail": detail }))).into_response()
}
