//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use quickchat_api::{AppState, build_router};
use quickchat_core::Identity;
use quickchat_core::config::{AppConfig, HandshakeMode};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching services directly
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with default settings
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application using the given handshake policy
    pub fn with_handshake(mode: HandshakeMode) -> Self {
        let mut config = test_config();
        config.realtime.handshake_mode = mode;
        Self::with_config(config)
    }

    /// Create a test application from a full config
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::build(config).expect("Failed to build state");
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Issue a session token for an identity without creating an account
    pub fn token_for(&self, raw: &str) -> String {
        let identity = Identity::parse(raw).expect("valid identity");
        self.state
            .tokens
            .issue(&identity)
            .expect("Failed to issue token")
            .token
    }

    /// Create an account through the API, returning (identity, token)
    pub async fn sign_up(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "fullName": "Test User",
                    "email": email,
                    "password": password,
                    "bio": "integration test account",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "signup failed: {:?}", response.body);

        let identity = response.body["userData"]["_id"]
            .as_str()
            .expect("userData._id")
            .to_string();
        let token = response.body["token"].as_str().expect("token").to_string();
        (identity, token)
    }

    /// Make a request to the test application
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("token", token);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        send(self.router.clone(), req).await
    }

    /// Serve the router on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let app = self
            .router
            .clone()
            .into_make_service_with_connect_info::<SocketAddr>();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        addr
    }
}

/// Send a prepared request through a router
pub async fn send(router: Router, req: Request<Body>) -> TestResponse {
    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let text = String::from_utf8_lossy(&body_bytes).to_string();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body, text }
}

/// Config used by every integration test
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw body text
    pub text: String,
}
