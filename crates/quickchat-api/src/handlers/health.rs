//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/status
pub async fn status() -> &'static str {
    "Server is live"
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway = &state.realtime.gateway;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        online_users: gateway.online_count(),
        ws_connections: gateway.connection_count(),
    })
}
