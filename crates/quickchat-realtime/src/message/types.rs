//! Inbound and outbound WebSocket message type definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quickchat_core::Identity;
use quickchat_core::error::AppError;

use crate::connection::handle::OutboundFrame;

/// Name of the presence event carrying the online set.
pub const ONLINE_USERS_EVENT: &str = "getOnlineUsers";

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Application-level pong.
    Pong,
    /// Ask for the current online set, answered to this connection only.
    GetOnlineUsers,
}

/// Named events sent by the server to the client.
///
/// Serialized as `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full set of currently online identities.
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers(Vec<Identity>),
    /// This connection lost its presence entry to a newer one.
    #[serde(rename = "superseded")]
    Superseded {
        /// The connection that took over.
        replaced_by: Uuid,
    },
    /// Request could not be processed.
    #[serde(rename = "error")]
    Error {
        /// Machine-readable code.
        code: String,
        /// Description.
        message: String,
    },
}

impl ServerEvent {
    /// Serializes into a frame ready to queue on any number of connections.
    pub fn to_frame(&self) -> Result<OutboundFrame, AppError> {
        let json = serde_json::to_string(self)?;
        Ok(OutboundFrame::Text(Arc::from(json)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_users_shape() {
        let event = ServerEvent::OnlineUsers(vec![
            Identity::parse("u1").unwrap(),
            Identity::parse("u2").unwrap(),
        ]);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": ONLINE_USERS_EVENT, "data": ["u1", "u2"] })
        );
    }

    #[test]
    fn test_inbound_parse() {
        let msg: InboundMessage = serde_json::from_str(r#"{"type":"get_online_users"}"#).unwrap();
        assert_eq!(msg, InboundMessage::GetOnlineUsers);
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"subscribe"}"#).is_err());
    }
}
