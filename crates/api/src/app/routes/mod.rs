use axum::{routing::post, Router};

pub mod auth;
pub mod issue;
pub mod project;
pub mod user;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/auth/login/test-token", post(auth::test_token))
        .nest("/api/user", user::router())
        .nest("/api/project", project::router())
        .nest("/api/issue", issue::router())
}
