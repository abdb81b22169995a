//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;
use tracing::{debug, warn};

use quickchat_core::config::RealtimeConfig;

use super::gateway::ConnectionGateway;
use super::handle::{ConnectionHandle, Delivery, OutboundFrame};

/// Heartbeat configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Timeout before considering connection dead
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds.max(1)),
        }
    }
}

/// Run heartbeat loop for a connection.
///
/// Queues a ping every interval and closes the connection through the
/// gateway once no pong has arrived within the timeout. Ends as soon as the
/// connection is closed by any other path.
pub async fn run_heartbeat(
    gateway: Arc<ConnectionGateway>,
    handle: Arc<ConnectionHandle>,
    config: HeartbeatConfig,
) {
    let mut interval = time::interval(config.ping_interval);
    // First tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = handle.closed() => break,
            _ = interval.tick() => {}
        }

        let elapsed = Utc::now() - handle.last_pong();
        if let Ok(elapsed) = elapsed.to_std() {
            if elapsed > config.ping_timeout {
                warn!(
                    conn_id = %handle.id,
                    last_pong_ago = ?elapsed,
                    "Heartbeat timeout"
                );
                gateway.close(&handle).await;
                break;
            }
        }

        match handle.deliver(OutboundFrame::Ping) {
            Delivery::Delivered => {}
            // A peer this far behind will hit the timeout if it stays silent.
            Delivery::Full => debug!(conn_id = %handle.id, "Ping skipped, queue full"),
            Delivery::Closed => {
                debug!(conn_id = %handle.id, "Ping send failed, closing");
                gateway.close(&handle).await;
                break;
            }
        }
    }

    debug!(conn_id = %handle.id, "Heartbeat loop ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::MemoryPresenceRegistry;
    use quickchat_core::Identity;

    fn config() -> HeartbeatConfig {
        HeartbeatConfig {
            ping_interval: Duration::from_millis(20),
            ping_timeout: Duration::from_millis(70),
        }
    }

    fn gateway() -> Arc<ConnectionGateway> {
        Arc::new(ConnectionGateway::new(
            RealtimeConfig::default(),
            Arc::new(MemoryPresenceRegistry::new()),
        ))
    }

    #[test]
    fn test_config_from_realtime() {
        let hb = HeartbeatConfig::from(&RealtimeConfig::default());
        assert_eq!(hb.ping_interval, Duration::from_secs(25));
        assert_eq!(hb.ping_timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_silent_peer_is_closed() {
        let gw = gateway();
        let (handle, mut rx) = gw.open(Identity::parse("u1").ok()).await;

        let task = tokio::spawn(run_heartbeat(Arc::clone(&gw), Arc::clone(&handle), config()));
        time::timeout(Duration::from_secs(2), task)
            .await
            .expect("heartbeat ends")
            .unwrap();

        assert!(handle.is_closed());
        assert_eq!(gw.online_count(), 0);

        let mut pings = 0;
        while let Ok(frame) = rx.try_recv() {
            if matches!(frame, OutboundFrame::Ping) {
                pings += 1;
            }
        }
        assert!(pings >= 1);
    }

    #[tokio::test]
    async fn test_loop_ends_when_closed_elsewhere() {
        let gw = gateway();
        let (handle, _rx) = gw.open(Identity::parse("u1").ok()).await;

        let task = tokio::spawn(run_heartbeat(
            Arc::clone(&gw),
            Arc::clone(&handle),
            HeartbeatConfig {
                ping_interval: Duration::from_secs(30),
                ping_timeout: Duration::from_secs(60),
            },
        ));
        tokio::task::yield_now().await;
        gw.close(&handle).await;

        time::timeout(Duration::from_secs(1), task)
            .await
            .expect("heartbeat ends")
            .unwrap();
    }
}
