//! Route definitions for the QuickChat HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket upgrade lives at
//! `/ws`. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(public_auth_routes())
        .merge(guarded_routes(state.clone()));

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Liveness endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::health::status))
        .route("/health", get(handlers::health::health))
}

/// Account creation and login
fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
}

/// Routes behind the session guard
fn guarded_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/check", get(handlers::auth::check))
        .route("/auth/update-profile", post(handlers::auth::update_profile))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/presence/online", get(handlers::presence::online_users))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::session_guard,
        ))
}
