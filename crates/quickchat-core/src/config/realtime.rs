//! Real-time WebSocket gateway configuration.

use serde::{Deserialize, Serialize};

/// How the gateway learns who is on the other end of a WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeMode {
    /// The `token` query parameter is verified; its subject is the identity.
    #[default]
    Verified,
    /// The `userId` query parameter is trusted without proof.
    Claimed,
}

/// Real-time (WebSocket) gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Handshake identity policy.
    #[serde(default)]
    pub handshake_mode: HandshakeMode,
    /// Outbound queue capacity per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Close the older connection when the same identity connects again.
    #[serde(default = "default_true")]
    pub close_superseded: bool,
    /// WebSocket ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Seconds without a pong before the connection is dropped.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            handshake_mode: HandshakeMode::default(),
            channel_buffer_size: default_channel_buffer(),
            close_superseded: default_true(),
            ping_interval_seconds: default_ping_interval(),
            ping_timeout_seconds: default_ping_timeout(),
        }
    }
}

fn default_channel_buffer() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_ping_interval() -> u64 {
    25
}

fn default_ping_timeout() -> u64 {
    60
}
