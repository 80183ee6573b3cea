use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use trackline_api::app::{build_app, AppContext};
use trackline_auth::TokenSigner;
use trackline_notify::NoopNotifier;
use trackline_service::{IssueService, ProjectService, UserService};
use trackline_store::MemoryStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, wired over the in-memory store and bound to
        // an ephemeral port.
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenSigner::new("test-secret", 30));

        let ctx = AppContext {
            users: Arc::new(UserService::new(store.clone(), tokens)),
            projects: Arc::new(ProjectService::new(store.clone(), store.clone())),
            issues: Arc::new(IssueService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(NoopNotifier),
            )),
        };

        let app = build_app(ctx);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    is_admin: bool,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/api/user/register", base_url))
        .json(&json!({ "email": email, "password": "p", "is_admin": is_admin }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/login/token", base_url))
        .json(&json!({ "email": email, "password": "p" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    is_admin: bool,
) -> String {
    register(client, base_url, email, is_admin).await;
    login(client, base_url, email).await
}

async fn detail(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["detail"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(detail(res).await, "Could not validate credentials");

    let res = client
        .get(format!("{}/api/user/me", srv.base_url))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(detail(res).await, "Could not validate credentials");
}

#[tokio::test]
async fn register_login_me_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = register(&client, &srv.base_url, "a@a.com", false).await;
    assert_eq!(created["email"], "a@a.com");
    assert_eq!(created["is_admin"], false);
    // The hash never appears in responses.
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let token = login(&client, &srv.base_url, "a@a.com").await;

    let res = client
        .get(format!("{}/api/user/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["email"], "a@a.com");

    let res = client
        .post(format!("{}/api/auth/login/test-token", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Wrong password and unknown user.
    let res = client
        .post(format!("{}/api/auth/login/token", srv.base_url))
        .json(&json!({ "email": "a@a.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "Wrong password");

    let res = client
        .post(format!("{}/api/auth/login/token", srv.base_url))
        .json(&json!({ "email": "ghost@a.com", "password": "p" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "User not found");

    // Duplicate registration.
    let res = client
        .post(format!("{}/api/user/register", srv.base_url))
        .json(&json!({ "email": "a@a.com", "password": "q" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "User already exist");
}

#[tokio::test]
async fn user_listing_requires_admin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user_token = register_and_login(&client, &srv.base_url, "a@a.com", false).await;
    let admin_token = register_and_login(&client, &srv.base_url, "admin@a.com", true).await;

    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "User has no admin privileges");

    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let users: serde_json::Value = res.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn negative_pagination_yields_empty_page_not_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &srv.base_url, "o@o.com", false).await;

    let res = client
        .post(format!("{}/api/project", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Foo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/project?skip=-1&limit=-10", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let projects: serde_json::Value = res.json().await.unwrap();
    assert!(projects.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn project_lifecycle_and_permissions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner_token = register_and_login(&client, &srv.base_url, "o@o.com", false).await;
    let outsider_token = register_and_login(&client, &srv.base_url, "x@x.com", false).await;
    let admin_token = register_and_login(&client, &srv.base_url, "admin@a.com", true).await;

    // Admin may not create projects.
    let res = client
        .post(format!("{}/api/project", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "title": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "Not enough permissions");

    let res = client
        .post(format!("{}/api/project", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Foo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let project: serde_json::Value = res.json().await.unwrap();
    let project_id = project["id"].as_i64().unwrap();
    assert_eq!(project["title"], "Foo");

    // Outsider cannot read someone else's project.
    let res = client
        .get(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&outsider_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "Not enough permissions");

    // Assigning a nonexistent user fails and changes nothing.
    let res = client
        .put(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&owner_token)
        .json(&json!({ "assigned_id": 9999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "User not found");

    // Partial update keeps the assignment absent and renames.
    let res = client
        .put(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Bar" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["title"], "Bar");
    assert!(updated["assigned_id"].is_null());

    // Admin may read and update, but not delete.
    let res = client
        .get(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "Not enough permissions");

    // Owner deletes; the project then reads as gone and drops out of lists.
    let res = client
        .delete(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/project/{}", srv.base_url, project_id))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "Project not found");

    let res = client
        .get(format!("{}/api/project", srv.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let projects: serde_json::Value = res.json().await.unwrap();
    assert!(projects.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn issue_lifecycle_and_permissions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner_token = register_and_login(&client, &srv.base_url, "o@o.com", false).await;
    let assignee = register(&client, &srv.base_url, "a@a.com", false).await;
    let assignee_token = login(&client, &srv.base_url, "a@a.com").await;

    let res = client
        .post(format!("{}/api/project", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Foo", "assigned_id": assignee["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let project: serde_json::Value = res.json().await.unwrap();
    let project_id = project["id"].as_i64().unwrap();

    // project_id is mandatory and must reference a live project.
    let res = client
        .post(format!("{}/api/issue", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "i", "type": "bug", "status": "New" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "Project is required");

    let res = client
        .post(format!("{}/api/issue", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "i", "type": "bug", "status": "New", "project_id": 9999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "Project not found");

    let res = client
        .post(format!("{}/api/issue", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "i", "type": "bug", "status": "New", "project_id": project_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let issue: serde_json::Value = res.json().await.unwrap();
    let issue_id = issue["id"].as_i64().unwrap();
    assert_eq!(issue["type"], "bug");

    // Assignee reads the project's issues but cannot mutate them.
    let res = client
        .get(format!("{}/api/issue/project/{}", srv.base_url, project_id))
        .bearer_auth(&assignee_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let issues: serde_json::Value = res.json().await.unwrap();
    assert_eq!(issues.as_array().unwrap().len(), 1);

    let res = client
        .put(format!("{}/api/issue/{}", srv.base_url, issue_id))
        .bearer_auth(&assignee_token)
        .json(&json!({ "status": "Done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "Not enough permissions");

    // Owner moves the status.
    let res = client
        .put(format!("{}/api/issue/{}", srv.base_url, issue_id))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "Done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "Done");
    assert_eq!(updated["title"], "i");

    // Owner deletes; the issue then reads as gone.
    let res = client
        .delete(format!("{}/api/issue/{}", srv.base_url, issue_id))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/issue/{}", srv.base_url, issue_id))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "Issue not found");
}
