//! [`TokenService`] — issue and verify session credentials.
//!
//! Tokens are self-contained: the server keeps no record of issued tokens
//! and has no revocation list. Logout is the client discarding its token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use quickchat_core::Identity;
use quickchat_core::config::AuthConfig;
use quickchat_core::error::AppError;

use crate::jwt::{JwtDecoder, JwtEncoder};

/// A freshly issued credential handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    /// The signed token string.
    pub token: String,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Returns the raw token string.
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

/// Issues and verifies signed session tokens with a process-wide secret.
///
/// Verification is pure computation over immutable state, so the service is
/// shared behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Creates a token service from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("Token signing secret is empty"));
        }

        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
        })
    }

    /// Issues a token binding `identity` to the current time.
    pub fn issue(&self, identity: &Identity) -> Result<SessionToken, AppError> {
        let (token, claims) = self.encoder.encode(identity)?;
        debug!(identity = %identity, jti = %claims.jti, "Issued session token");

        Ok(SessionToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Resolves a token to the identity it was issued for.
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthenticated("Missing session token"));
        }

        self.decoder.decode(token).map(|claims| claims.sub)
    }

    /// Returns the encoder, for callers that need custom issuance times.
    pub fn encoder(&self) -> &JwtEncoder {
        &self.encoder
    }
}
