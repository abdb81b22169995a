//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickchat_core::Identity;

/// Context for the current authenticated request.
///
/// Inserted by the session guard and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated identity (token subject).
    pub identity: Identity,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity, ip_address: String, user_agent: Option<String>) -> Self {
        Self {
            identity,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }
}
