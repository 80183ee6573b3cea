use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use trackline_core::UserView;
use trackline_service::Registration;

use crate::app::{dto, errors, AppContext};
use crate::context::Actor;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(retrieve_user_me))
}

/// Public: creates an account. Admin accounts are minted the same way,
/// with `is_admin` in the payload.
pub async fn register(
    Extension(ctx): Extension<AppContext>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let registration = Registration {
        name: body.name,
        email: body.email,
        password: body.password,
        is_admin: body.is_admin,
    };

    match ctx.users.register(registration).await {
        Ok(user) => (StatusCode::OK, Json(UserView::from(&user))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn retrieve_user_me(Extension(actor): Extension<Actor>) -> axum::response::Response {
    (StatusCode::OK, Json(UserView::from(&actor.0))).into_response()
}

pub async fn list_users(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match ctx.users.list(&actor.0, query.into()).await {
        Ok(users) => {
            let views: Vec<UserView> = users.iter().map(UserView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => errors::error_response(err),
    }
}
