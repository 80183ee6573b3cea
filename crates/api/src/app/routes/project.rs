use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use trackline_core::{ProjectId, ProjectPatch, ProjectView};

use crate::app::{dto, errors, AppContext};
use crate::context::Actor;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(retrieve_project)
                .put(update_project)
                .delete(delete_project),
        )
}

pub async fn retrieve_project(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match ctx.projects.retrieve(&actor.0, ProjectId::new(id)).await {
        Ok(project) => (StatusCode::OK, Json(ProjectView::from(&project))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn list_projects(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match ctx.projects.list(&actor.0, query.into()).await {
        Ok(projects) => {
            let views: Vec<ProjectView> = projects.iter().map(ProjectView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => errors::error_response(err),
    }
}

pub async fn create_project(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<dto::CreateProjectRequest>,
) -> axum::response::Response {
    match ctx
        .projects
        .create(&actor.0, body.title, body.assigned_id)
        .await
    {
        Ok(project) => (StatusCode::OK, Json(ProjectView::from(&project))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn update_project(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(patch): Json<ProjectPatch>,
) -> axum::response::Response {
    match ctx.projects.update(&actor.0, ProjectId::new(id), patch).await {
        Ok(project) => (StatusCode::OK, Json(ProjectView::from(&project))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn delete_project(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match ctx.projects.delete(&actor.0, ProjectId::new(id)).await {
        Ok(project) => (StatusCode::OK, Json(ProjectView::from(&project))).into_response(),
        Err(err) => errors::error_response(err),
    }
}
