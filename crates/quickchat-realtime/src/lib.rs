//! # quickchat-realtime
//!
//! Real-time presence engine for QuickChat. Provides:
//!
//! - Per-connection handles with bounded outbound queues and exactly-once close
//! - A presence registry mapping each online identity to one live connection
//! - A gateway that registers/deregisters connections and broadcasts the
//!   full online set to every registered connection after each change
//! - Handshake authentication (verified token or claimed `userId`)
//! - Ping/pong heartbeat

pub mod connection;
pub mod message;
pub mod presence;
pub mod server;

pub use connection::authenticator::{HandshakeParams, WsAuthenticator};
pub use connection::gateway::ConnectionGateway;
pub use connection::heartbeat::{HeartbeatConfig, run_heartbeat};
pub use connection::handle::{ConnectionHandle, ConnectionId, ConnectionState, Delivery, OutboundFrame};
pub use message::types::{InboundMessage, ServerEvent};
pub use presence::{MemoryPresenceRegistry, PresenceStore};
pub use server::RealtimeEngine;
