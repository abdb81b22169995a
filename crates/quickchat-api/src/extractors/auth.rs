//! `AuthUser` extractor — the authenticated [`RequestContext`] for a handler.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use quickchat_auth::TokenService;
use quickchat_core::error::AppError;
use quickchat_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the raw session token.
pub const TOKEN_HEADER: &str = "token";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The session guard already did the work on guarded routes.
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(AuthUser(ctx.clone()));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let ctx = authenticate(&parts.headers, peer, &state.tokens)?;
        Ok(AuthUser(ctx))
    }
}

/// Pulls the credential from `token` or `Authorization: Bearer`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        })?;

    let token = raw.trim();
    (!token.is_empty()).then_some(token)
}

/// Verifies the request credential and builds its [`RequestContext`].
pub fn authenticate(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    tokens: &TokenService,
) -> Result<RequestContext, AppError> {
    let token = extract_token(headers)
        .ok_or_else(|| AppError::unauthenticated("Not authorized, no token"))?;

    let identity = tokens.verify(token)?;

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    Ok(RequestContext::new(identity, ip_address, user_agent))
}
