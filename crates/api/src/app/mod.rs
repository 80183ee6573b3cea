//! HTTP application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per entity)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//! - `cors.rs`: permissive CORS middleware

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Extension, Router};
use tower::ServiceBuilder;

use trackline_service::{IssueService, ProjectService, UserService};

use crate::middleware;

pub mod cors;
pub mod dto;
pub mod errors;
pub mod routes;

/// Shared handles to the domain services, available to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<UserService>,
    pub projects: Arc<ProjectService>,
    pub issues: Arc<IssueService>,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Registration and login stay outside the auth middleware; everything else
/// under `/api` requires a bearer token.
pub fn build_app(ctx: AppContext) -> Router {
    let auth_state = middleware::AuthState {
        users: ctx.users.clone(),
    };

    let public = Router::new()
        .route(
            "/api/auth/login/token",
            axum::routing::post(routes::auth::login_access_token),
        )
        .route(
            "/api/user/register",
            axum::routing::post(routes::user::register),
        );

    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(public)
        .merge(protected)
        .layer(Extension(ctx))
        .layer(axum::middleware::from_fn(cors::cors_middleware))
        .layer(ServiceBuilder::new())
}

async fn health() -> StatusCode {
    StatusCode::OK
}
