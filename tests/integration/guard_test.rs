//! Integration tests for the session guard.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::body::Body;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use http::{Request, StatusCode};

use quickchat_api::AppState;
use quickchat_api::extractors::AuthUser;
use quickchat_api::middleware::auth::session_guard;

/// A guarded route whose handler records whether it ran.
fn probe_router(state: AppState, invoked: Arc<AtomicBool>) -> Router {
    Router::new()
        .route(
            "/probe",
            get(move |auth: AuthUser| {
                let invoked = Arc::clone(&invoked);
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    auth.identity.to_string()
                }
            }),
        )
        .route_layer(from_fn_with_state(state.clone(), session_guard))
        .with_state(state)
}

fn probe_request(headers: &[(&str, &str)]) -> Request<Body> {
    let mut req = Request::builder().method("GET").uri("/probe");
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    req.body(Body::empty()).expect("Failed to build request")
}

#[tokio::test]
async fn test_missing_credential_never_reaches_handler() {
    let app = helpers::TestApp::new();
    let invoked = Arc::new(AtomicBool::new(false));
    let router = probe_router(app.state.clone(), Arc::clone(&invoked));

    let response = helpers::send(router, probe_request(&[])).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_invalid_credential_never_reaches_handler() {
    let app = helpers::TestApp::new();
    let invoked = Arc::new(AtomicBool::new(false));
    let router = probe_router(app.state.clone(), Arc::clone(&invoked));

    let response = helpers::send(router, probe_request(&[("token", "not-a-jwt")])).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_foreign_secret_rejected() {
    let app = helpers::TestApp::new();
    let other = helpers::TestApp::with_config({
        let mut config = helpers::test_config();
        config.auth.jwt_secret = "some-other-secret".to_string();
        config
    });
    let invoked = Arc::new(AtomicBool::new(false));
    let router = probe_router(app.state.clone(), Arc::clone(&invoked));

    let token = other.token_for("u1");
    let response = helpers::send(router, probe_request(&[("token", &token)])).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_valid_credential_reaches_handler() {
    let app = helpers::TestApp::new();
    let invoked = Arc::new(AtomicBool::new(false));
    let router = probe_router(app.state.clone(), Arc::clone(&invoked));
    let token = app.token_for("u1");

    let bearer = format!("Bearer {token}");
    let response =
        helpers::send(router, probe_request(&[("authorization", bearer.as_str())])).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "u1");
    assert!(invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_real_guarded_routes_reject_anonymous() {
    let app = helpers::TestApp::new();

    for (method, path) in [
        ("GET", "/api/auth/check"),
        ("POST", "/api/auth/update-profile"),
        ("POST", "/api/auth/logout"),
        ("GET", "/api/presence/online"),
    ] {
        let response = app.request(method, path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {path}");
    }
}
