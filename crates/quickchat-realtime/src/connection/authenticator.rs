//! WebSocket handshake authentication, resolving who is connecting from
//! the query parameters presented at upgrade time.

use std::sync::Arc;

use serde::Deserialize;

use quickchat_auth::TokenService;
use quickchat_core::Identity;
use quickchat_core::config::HandshakeMode;
use quickchat_core::error::AppError;

/// Query parameters accepted on the WebSocket upgrade request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeParams {
    /// Identity claimed by the client.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    /// Session token.
    #[serde(default)]
    pub token: Option<String>,
}

impl HandshakeParams {
    fn claimed(&self) -> Option<&str> {
        self.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Resolves handshake parameters to an optional identity.
///
/// `Ok(None)` means the connection proceeds anonymously: it stays open
/// but never enters presence.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// Token verifier.
    tokens: Arc<TokenService>,
    /// Identity policy.
    mode: HandshakeMode,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator")
            .field("mode", &self.mode)
            .finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(tokens: Arc<TokenService>, mode: HandshakeMode) -> Self {
        Self { tokens, mode }
    }

    /// Returns the active handshake policy.
    pub fn mode(&self) -> HandshakeMode {
        self.mode
    }

    /// Authenticates a handshake.
    ///
    /// In `Verified` mode a present token must verify, and a `userId`
    /// sent alongside must match its subject; a `userId` without a token
    /// is rejected. In `Claimed` mode `userId` is taken as-is and the
    /// token is ignored.
    pub fn authenticate(&self, params: &HandshakeParams) -> Result<Option<Identity>, AppError> {
        match self.mode {
            HandshakeMode::Claimed => Ok(params.claimed().and_then(|raw| Identity::parse(raw).ok())),
            HandshakeMode::Verified => match (params.token(), params.claimed()) {
                (Some(token), claimed) => {
                    let identity = self.tokens.verify(token)?;
                    if let Some(claimed) = claimed {
                        if claimed != identity.as_str() {
                            return Err(AppError::unauthenticated(
                                "userId does not match the session token",
                            ));
                        }
                    }
                    Ok(Some(identity))
                }
                (None, Some(_)) => Err(AppError::unauthenticated(
                    "A session token is required to claim an identity",
                )),
                (None, None) => Ok(None),
            },
        }
    }
}
