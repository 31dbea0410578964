//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use kiosk_api::AppState;
use kiosk_core::config::{AppConfig, StorageBackend};

/// Admin password configured for every test app.
pub const ADMIN_PASSWORD: &str = "test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching the queue service directly
    pub state: AppState,
    /// Route prefix
    pub prefix: String,
}

impl TestApp {
    /// Create a new test application on the in-memory store
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.storage = StorageBackend::Memory;
        config.admin.password = ADMIN_PASSWORD.to_string();
        config.notification.provider = "log".to_string();

        let prefix = config.server.url_prefix.clone();
        let state = kiosk_api::build_state(config, false)
            .await
            .expect("Failed to build state");
        let router = kiosk_api::build_app(state.clone());

        Self {
            router,
            state,
            prefix,
        }
    }

    /// Serve the router on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });
        addr
    }

    /// Make a JSON request; `path` is relative to the route prefix
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(method, path, "application/json", None, body_str)
            .await
    }

    /// Make a JSON request carrying the admin password header
    pub async fn admin_request(&self, path: &str, body: Value) -> TestResponse {
        let body_str = serde_json::to_string(&body).expect("Failed to serialize body");
        self.send(
            "POST",
            path,
            "application/json",
            Some(ADMIN_PASSWORD),
            body_str,
        )
        .await
    }

    /// Make a form-encoded POST
    pub async fn form(&self, path: &str, body: &str) -> TestResponse {
        self.send(
            "POST",
            path,
            "application/x-www-form-urlencoded",
            None,
            body.to_string(),
        )
        .await
    }

    /// Join through the HTTP API and return the response body
    pub async fn join(&self, body: Value) -> Value {
        let response = self.request("POST", "/join", Some(body)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Join failed: {:?}",
            response.body
        );
        response.body
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        admin_password: Option<&str>,
        body: String,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(format!("{}{}", self.prefix, path))
            .header("Content-Type", content_type);

        if let Some(password) = admin_password {
            req = req.header("x-admin-password", password);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}
