//! Presence query handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::OnlineUsersResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/presence/online
pub async fn online_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<OnlineUsersResponse> {
    Json(OnlineUsersResponse {
        success: true,
        online_users: state.realtime.gateway.online(),
    })
}
