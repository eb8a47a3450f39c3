/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store, so the HTTP tests need no
/// database. Requests go through `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use taskvault_api::app::{build_router, AppState};
use taskvault_api::config::Config;
use taskvault_shared::auth::password::Argon2Hasher;
use taskvault_shared::store::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and its state
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a router over a fresh in-memory store
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            "JWT_EXPIRATION_SECONDS" => Some("3600".to_string()),
            _ => None,
        })
        .expect("test config");

        // Cheap Argon2 parameters keep the suite fast
        let state = AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(Argon2Hasher::new(1024, 1, 1)),
        )
        .expect("test state");

        Self {
            app: build_router(state.clone()),
            state,
        }
    }

    /// Sends a request and decodes the JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a pre-built request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers a user and returns `(token, user_id)`
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, i64) {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register: {}", response.body);

        let token = response.body["token"].as_str().unwrap().to_string();
        let user_id = response.body["userId"].as_i64().unwrap();
        (token, user_id)
    }

    /// Creates a task and returns its ID
    pub async fn create_task(&self, token: &str, title: &str) -> i64 {
        let response = self
            .request(
                Method::POST,
                "/api/tasks",
                Some(token),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create: {}", response.body);

        response.body["id"].as_i64().unwrap()
    }
}
