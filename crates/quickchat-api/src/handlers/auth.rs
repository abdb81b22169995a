//! Auth handlers — signup, login, check, update-profile, logout.

use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::dto::request::{LoginRequest, SignUpRequest, UpdateProfileRequest, validated};
use crate::dto::response::{AuthResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = validated(req)?;
    let outcome = state.user_service.sign_up(req.into()).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Account created".to_string(),
        user_data: outcome.user,
        token: outcome.token.token,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = validated(req)?;
    let outcome = state.user_service.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user_data: outcome.user,
        token: outcome.token.token,
    }))
}

/// GET /api/auth/check
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.get_profile(auth.context()).await?;

    Ok(Json(UserResponse {
        success: true,
        message: None,
        user,
    }))
}

/// POST /api/auth/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let req = validated(req)?;
    let user = state
        .user_service
        .update_profile(auth.context(), req.into())
        .await?;

    Ok(Json(UserResponse {
        success: true,
        message: Some("Account updated".to_string()),
        user,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(auth: AuthUser) -> Json<MessageResponse> {
    info!(identity = %auth.identity, ip = %auth.ip_address, "Logout");

    Json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    })
}
