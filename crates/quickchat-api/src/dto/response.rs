//! Response DTOs.

use serde::{Deserialize, Serialize};

use quickchat_core::Identity;
use quickchat_core::types::UserProfile;

/// Sign-up / login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome description.
    pub message: String,
    /// The account.
    pub user_data: UserProfile,
    /// Session token to present on later requests.
    pub token: String,
}

/// Response carrying the caller's own account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome description, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The account.
    pub user: UserProfile,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome description.
    pub message: String,
}

/// Current online set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersResponse {
    /// Always `true`.
    pub success: bool,
    /// Online identities, sorted.
    pub online_users: Vec<Identity>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Identities currently online.
    pub online_users: usize,
    /// Open WebSocket connections, anonymous included.
    pub ws_connections: usize,
}
