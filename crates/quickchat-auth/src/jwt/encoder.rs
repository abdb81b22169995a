//! Session token signing with configurable TTL.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use quickchat_core::Identity;
use quickchat_core::config::AuthConfig;
use quickchat_core::error::AppError;

use super::claims::Claims;

/// Creates signed HS256 session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime.
    ttl: TimeDelta,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails when the TTL does not fit a signed duration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let ttl = i64::try_from(config.token_ttl_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Token TTL of {} minutes is out of range",
                    config.token_ttl_minutes
                ))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl,
        })
    }

    /// Signs a token for `identity` issued now.
    pub fn encode(&self, identity: &Identity) -> Result<(String, Claims), AppError> {
        self.encode_at(identity, Utc::now())
    }

    /// Signs a token for `identity` as if issued at `issued_at`.
    pub fn encode_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, Claims), AppError> {
        let exp = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::configuration("Token expiry falls outside the representable time range")
        })?;

        let claims = Claims {
            sub: identity.clone(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok((token, claims))
    }
}
