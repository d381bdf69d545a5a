//! Shared helpers for HTTP-level integration tests.
//!
//! Every request goes through the production router from
//! [`timetrack_api::router::build_app_router`], so the full middleware stack
//! and the shared cache are exercised.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use timetrack_api::auth::jwt::JwtConfig;
use timetrack_api::auth::password::hash_password;
use timetrack_api::config::{CacheConfig, LogFormat, ServerConfig};
use timetrack_api::router::build_app_router;
use timetrack_api::state::AppState;
use timetrack_core::types::DbId;
use timetrack_db::models::user::CreateUser;
use timetrack_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "correct-horse";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        cache: CacheConfig {
            ttl_secs: 300,
            max_entries: 1_000,
        },
    }
}

/// Build the full application router over `pool`.
///
/// Clone the returned router to send several requests against one cache.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered user and a valid token for them.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

pub fn registration_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": TEST_PASSWORD,
        "name": "Ivan",
        "surname": "Petrov",
        "address": "Main street 1",
    })
}

/// Register `email` through the API and return its id and token.
pub async fn register(app: &Router, email: &str) -> TestUser {
    let response = post_json(app.clone(), "/api/v1/users", registration_body(email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestUser {
        id: json["user"]["id"].as_i64().unwrap(),
        token: json["access_token"].as_str().unwrap().to_string(),
    }
}

/// Insert an admin directly, then log in through the API.
///
/// Must run before `app` has cached the user, since the admin flag is read
/// through the cache.
pub async fn create_admin(pool: &PgPool, app: &Router, email: &str) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            name: "Admin".to_string(),
            surname: "Root".to_string(),
            patronymic: None,
            address: "HQ".to_string(),
            passport_series: None,
            passport_number: None,
        },
    )
    .await
    .unwrap();
    UserRepo::set_admin(pool, user.id, true).await.unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/users/login",
        json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["is_admin"], true);
    TestUser {
        id: user.id,
        token: json["access_token"].as_str().unwrap().to_string(),
    }
}

/// Create a project owned by `owner` and return its id.
pub async fn create_project(app: &Router, owner: &TestUser, name: &str) -> DbId {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects",
        json!({ "name": name, "description": "integration test" }),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a task in `project_id` as `user` and return its id.
pub async fn create_task(app: &Router, user: &TestUser, project_id: DbId, name: &str) -> DbId {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/tasks"),
        json!({ "name": name }),
        &user.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Add `member_id` to a project as `owner`.
pub async fn add_project_member(app: &Router, owner: &TestUser, project_id: DbId, member_id: DbId) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/users"),
        json!({ "user_id": member_id }),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Add `member_id` to a task as `owner`.
pub async fn add_task_member(
    app: &Router,
    owner: &TestUser,
    project_id: DbId,
    task_id: DbId,
    member_id: DbId,
) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/tasks/{task_id}/users"),
        json!({ "user_id": member_id }),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
