use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use trackline_core::{IssueId, IssuePatch, IssueView, ProjectId};
use trackline_service::IssueDraft;

use crate::app::{dto, errors, AppContext};
use crate::context::Actor;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_issues).post(create_issue))
        .route(
            "/:id",
            get(retrieve_issue).put(update_issue).delete(delete_issue),
        )
        .route("/project/:id", get(list_issues_by_project))
}

pub async fn retrieve_issue(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match ctx.issues.retrieve(&actor.0, IssueId::new(id)).await {
        Ok(issue) => (StatusCode::OK, Json(IssueView::from(&issue))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn list_issues(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match ctx.issues.list(&actor.0, query.into()).await {
        Ok(issues) => {
            let views: Vec<IssueView> = issues.iter().map(IssueView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => errors::error_response(err),
    }
}

pub async fn list_issues_by_project(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    match ctx
        .issues
        .list_by_project(&actor.0, ProjectId::new(id), query.into())
        .await
    {
        Ok(issues) => {
            let views: Vec<IssueView> = issues.iter().map(IssueView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => errors::error_response(err),
    }
}

pub async fn create_issue(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<dto::CreateIssueRequest>,
) -> axum::response::Response {
    let draft = IssueDraft {
        title: body.title,
        kind: body.kind,
        status: body.status,
        project_id: body.project_id,
    };

    match ctx.issues.create(&actor.0, draft).await {
        Ok(issue) => (StatusCode::OK, Json(IssueView::from(&issue))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn update_issue(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(patch): Json<IssuePatch>,
) -> axum::response::Response {
    match ctx.issues.update(&actor.0, IssueId::new(id), patch).await {
        Ok(issue) => (StatusCode::OK, Json(IssueView::from(&issue))).into_response(),
        Err(err) => errors::error_response(err),
    }
}

pub async fn delete_issue(
    Extension(ctx): Extension<AppContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match ctx.issues.delete(&actor.0, IssueId::new(id)).await {
        Ok(issue) => (StatusCode::OK, Json(IssueView::from(&issue))).into_response(),
        Err(err) => errors::error_response(err),
    }
}
