/// Integration tests for the TaskVault API
///
/// These tests drive the full router (security headers, CORS, tracing,
/// authenticator, handlers) over an in-memory store:
/// - Registration and login
/// - Bearer token handling
/// - Ownership-scoped task CRUD
/// - Error response shapes

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::json;
use taskvault_shared::auth::jwt::TokenService;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();

    let response = ctx.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");
}

#[tokio::test]
async fn test_register_returns_session() {
    let ctx = TestContext::new();

    let response = ctx
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Alice", "email": "alice@example.com", "password": "secret1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "alice@example.com");
    assert_eq!(response.body["name"], "Alice");
    assert!(response.body["userId"].is_i64());
    assert!(response.body["token"].is_string());
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    ctx.register("Alice", "alice@example.com", "secret1").await;

    let response = ctx
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "alice@example.com", "password": "secret2" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "conflict");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "A", "email": "nope", "password": "123" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "validation_error");

    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_success_and_failures() {
    let ctx = TestContext::new();
    let (_, user_id) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let ok = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["userId"], user_id);

    let wrong_password = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong-pass" })),
        )
        .await;
    let unknown_email = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "secret1" })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_end_to_end_register_login_create_list() {
    let ctx = TestContext::new();
    ctx.register("Alice", "alice@example.com", "secret1").await;

    let login = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "secret1" })),
        )
        .await;
    let token = login.body["token"].as_str().unwrap().to_string();

    ctx.create_task(&token, "Buy milk").await;

    let list = ctx.request(Method::GET, "/api/tasks", Some(&token), None).await;
    assert_eq!(list.status, StatusCode::OK);

    let tasks = list.body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["status"], "PENDING");
    assert!(tasks[0]["createdAt"].is_string());
    assert!(tasks[0].get("ownerId").is_none());
}

#[tokio::test]
async fn test_tasks_require_identity() {
    let ctx = TestContext::new();

    let anonymous = ctx.request(Method::GET, "/api/tasks", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let garbage = ctx
        .request(Method::GET, "/api/tasks", Some("not-a-token"), None)
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let create = ctx
        .request(Method::POST, "/api/tasks", None, Some(json!({ "title": "x" })))
        .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_checked_before_task_id_is_parsed() {
    let ctx = TestContext::new();

    for method in [Method::GET, Method::DELETE] {
        let anonymous = ctx.request(method, "/api/tasks/abc", None, None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    }
    let anonymous_update = ctx
        .request(Method::PUT, "/api/tasks/abc", None, Some(json!({ "title": "x" })))
        .await;
    assert_eq!(anonymous_update.status, StatusCode::UNAUTHORIZED);

    let (token, _) = ctx.register("Alice", "alice@example.com", "secret1").await;
    let authenticated = ctx
        .request(Method::GET, "/api/tasks/abc", Some(&token), None)
        .await;
    assert_eq!(authenticated.status, StatusCode::BAD_REQUEST);
    assert_eq!(authenticated.body["error"], "bad_request");
}

#[tokio::test]
async fn test_bearer_prefix_is_case_sensitive() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/tasks")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new();
    let (_, user_id) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let stale = ctx
        .state
        .tokens
        .issue_at("alice@example.com", user_id, Utc::now() - Duration::hours(2))
        .unwrap();

    let response = ctx.request(Method::GET, "/api/tasks", Some(&stale), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_rejected() {
    let ctx = TestContext::new();
    let (_, user_id) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let forger =
        TokenService::new("some-other-secret-that-is-long-enough!!", Duration::hours(1)).unwrap();
    let forged = forger.issue("alice@example.com", user_id).unwrap();

    let response = ctx.request(Method::GET, "/api/tasks", Some(&forged), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_on_public_route_is_ignored() {
    let ctx = TestContext::new();
    ctx.register("Alice", "alice@example.com", "secret1").await;

    let response = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            Some("garbage"),
            Some(json!({ "email": "alice@example.com", "password": "secret1" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_task_crud_lifecycle() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("Alice", "alice@example.com", "secret1").await;
    let id = ctx.create_task(&token, "Draft").await;
    let uri = format!("/api/tasks/{}", id);

    let fetched = ctx.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "Draft");

    let updated = ctx
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "title": "Final", "description": "done", "status": "COMPLETED" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["title"], "Final");
    assert_eq!(updated.body["description"], "done");
    assert_eq!(updated.body["status"], "COMPLETED");
    assert_eq!(updated.body["createdAt"], fetched.body["createdAt"]);

    let kept_status = ctx
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "title": "Renamed" })))
        .await;
    assert_eq!(kept_status.body["status"], "COMPLETED");
    assert!(kept_status.body["description"].is_null());

    let deleted = ctx.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let gone = ctx.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_validation() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let empty_title = ctx
        .request(Method::POST, "/api/tasks", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(empty_title.status, StatusCode::UNPROCESSABLE_ENTITY);

    let long_description = ctx
        .request(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": "ok", "description": "x".repeat(1001) })),
        )
        .await;
    assert_eq!(long_description.status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_status = ctx
        .request(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": "ok", "status": "ARCHIVED" })),
        )
        .await;
    assert!(bad_status.status.is_client_error());
}

#[tokio::test]
async fn test_users_are_isolated() {
    let ctx = TestContext::new();
    let (alice, _) = ctx.register("Alice", "alice@example.com", "secret1").await;
    let (bob, _) = ctx.register("Bob", "bob@example.com", "secret2").await;

    let alice_task = ctx.create_task(&alice, "Alice's").await;
    let bob_task = ctx.create_task(&bob, "Bob's").await;

    let alice_list = ctx.request(Method::GET, "/api/tasks", Some(&alice), None).await;
    let ids: Vec<i64> = alice_list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![alice_task]);

    let foreign = ctx
        .request(Method::GET, &format!("/api/tasks/{}", bob_task), Some(&alice), None)
        .await;
    let missing = ctx
        .request(Method::GET, "/api/tasks/999999", Some(&alice), None)
        .await;

    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body, missing.body);
}

#[tokio::test]
async fn test_foreign_update_and_delete_leave_task_intact() {
    let ctx = TestContext::new();
    let (alice, _) = ctx.register("Alice", "alice@example.com", "secret1").await;
    let (bob, _) = ctx.register("Bob", "bob@example.com", "secret2").await;
    let task = ctx.create_task(&alice, "Private").await;
    let uri = format!("/api/tasks/{}", task);

    let update = ctx
        .request(Method::PUT, &uri, Some(&bob), Some(json!({ "title": "Hijacked" })))
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let delete = ctx.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let still_there = ctx.request(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "Private");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("Alice", "alice@example.com", "secret1").await;

    let first = ctx.create_task(&token, "first").await;
    let second = ctx.create_task(&token, "second").await;

    let list = ctx.request(Method::GET, "/api/tasks", Some(&token), None).await;
    let ids: Vec<i64> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();

    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let ctx = TestContext::new();

    let response = ctx.request(Method::GET, "/api/tasks", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(response.headers.get("Cache-Control").unwrap(), "no-store");
}
