//! Top-level real-time engine that ties the presence subsystems together.

use std::sync::Arc;

use tracing::info;

use quickchat_auth::TokenService;
use quickchat_core::config::RealtimeConfig;

use crate::connection::authenticator::WsAuthenticator;
use crate::connection::gateway::ConnectionGateway;
use crate::connection::heartbeat::HeartbeatConfig;
use crate::presence::{MemoryPresenceRegistry, PresenceStore};

/// Central real-time engine shared by the HTTP layer.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection gateway.
    pub gateway: Arc<ConnectionGateway>,
    /// Presence store.
    pub presence: Arc<dyn PresenceStore>,
    /// Handshake authenticator.
    pub authenticator: WsAuthenticator,
    /// Configuration.
    config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("handshake_mode", &self.authenticator.mode())
            .field("connections", &self.gateway.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates an engine backed by the in-memory presence registry.
    pub fn new(config: RealtimeConfig, tokens: Arc<TokenService>) -> Self {
        Self::with_store(config, tokens, Arc::new(MemoryPresenceRegistry::new()))
    }

    /// Creates an engine over a caller-supplied presence store.
    pub fn with_store(
        config: RealtimeConfig,
        tokens: Arc<TokenService>,
        presence: Arc<dyn PresenceStore>,
    ) -> Self {
        let gateway = Arc::new(ConnectionGateway::new(
            config.clone(),
            Arc::clone(&presence),
        ));
        let authenticator = WsAuthenticator::new(tokens, config.handshake_mode);

        info!(
            handshake_mode = ?config.handshake_mode,
            channel_buffer = config.channel_buffer_size,
            "Real-time engine initialized"
        );

        Self {
            gateway,
            presence,
            authenticator,
            config,
        }
    }

    /// Heartbeat settings for new connections.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig::from(&self.config)
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Closes every connection. Socket tasks observe the close and exit.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.gateway.close_all().await;
        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickchat_core::Identity;
    use quickchat_core::config::AuthConfig;

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        let tokens = Arc::new(TokenService::new(&AuthConfig::default()).unwrap());
        let engine = RealtimeEngine::new(RealtimeConfig::default(), tokens);

        let (h1, _rx1) = engine.gateway.open(Identity::parse("u1").ok()).await;
        let (h2, _rx2) = engine.gateway.open(None).await;
        assert_eq!(engine.presence.len(), 1);

        engine.shutdown().await;

        assert!(h1.is_closed() && h2.is_closed());
        assert!(engine.presence.is_empty());
        assert_eq!(engine.gateway.connection_count(), 0);
    }
}
