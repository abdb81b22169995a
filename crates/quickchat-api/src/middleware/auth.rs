//! Session guard middleware for protected routes.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::extractors::auth::authenticate;
use crate::state::AppState;

/// Rejects requests without a valid session token before the handler runs.
///
/// On success the resolved `RequestContext` is inserted into the request
/// extensions, where the `AuthUser` extractor picks it up.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let ctx = match authenticate(request.headers(), peer, &state.tokens) {
        Ok(ctx) => ctx,
        Err(e) => {
            debug!(path = %request.uri().path(), reason = %e.message, "Session guard rejected request");
            return Err(e.into());
        }
    };

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
