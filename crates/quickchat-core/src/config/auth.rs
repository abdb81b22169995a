//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Set once at startup.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in minutes, at most [`MAX_TOKEN_TTL_MINUTES`].
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Tolerated clock skew when checking expiry, in seconds.
    #[serde(default = "default_clock_skew")]
    pub clock_skew_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            clock_skew_seconds: default_clock_skew(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    7 * 24 * 60
}

fn default_clock_skew() -> u64 {
    5
}
