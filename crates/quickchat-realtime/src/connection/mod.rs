//! WebSocket connection management — handles, handshake auth, gateway, heartbeat.

pub mod authenticator;
pub mod gateway;
pub mod handle;
pub mod heartbeat;

pub use authenticator::{HandshakeParams, WsAuthenticator};
pub use gateway::ConnectionGateway;
pub use handle::{ConnectionHandle, ConnectionId};
