use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use trackline_core::UserView;

use crate::app::{dto, errors, AppContext};
use crate::context::Actor;

pub async fn login_access_token(
    Extension(ctx): Extension<AppContext>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match ctx.users.login(&body.email, &body.password).await {
        Ok(token) => (
            StatusCode::OK,
            Json(dto::TokenResponse {
                access_token: token.access_token,
                token_type: "bearer",
                expired_minutes: token.expired_minutes,
            }),
        )
            .into_response(),
        Err(err) => errors::error_response(err),
    }
}

/// Echo the authenticated user; lets clients verify a stored token.
pub async fn test_token(Extension(actor): Extension<Actor>) -> axum::response::Response {
    (StatusCode::OK, Json(UserView::from(&actor.0))).into_response()
}
