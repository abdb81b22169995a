//! Connection gateway: registers connections in presence, closes them
//! exactly once, and broadcasts the online set after every change.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

use quickchat_core::Identity;
use quickchat_core::config::RealtimeConfig;

use crate::message::types::{InboundMessage, ServerEvent};
use crate::presence::PresenceStore;

use super::handle::{ConnectionHandle, ConnectionId, ConnectionState, Delivery, OutboundFrame};

/// Owns connection lifecycle and presence fan-out.
///
/// Every presence mutation is followed by a full-snapshot broadcast to all
/// registered connections. Broadcasts are serialized by `fanout` so each
/// connection receives snapshots in mutation order; delivery itself never
/// waits on a peer.
#[derive(Debug)]
pub struct ConnectionGateway {
    /// Identity → connection.
    presence: Arc<dyn PresenceStore>,
    /// Every open connection, registered or anonymous.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Serializes snapshot broadcasts; counts them.
    fanout: Mutex<u64>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionGateway {
    /// Creates a gateway over the given presence store.
    pub fn new(config: RealtimeConfig, presence: Arc<dyn PresenceStore>) -> Self {
        Self {
            presence,
            connections: DashMap::new(),
            fanout: Mutex::new(0),
            config,
        }
    }

    /// Accepts a new transport connection.
    ///
    /// With an identity the connection is registered (replacing any older
    /// connection for that identity) and the new online set is broadcast.
    /// Without one it stays open but never enters presence.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub async fn open(
        &self,
        identity: Option<Identity>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(identity.clone(), tx));
        self.connections.insert(handle.id, Arc::clone(&handle));

        let Some(identity) = identity else {
            handle.set_state(ConnectionState::Anonymous);
            info!(conn_id = %handle.id, "Anonymous connection opened");
            return (handle, rx);
        };

        let previous = self
            .presence
            .register(identity.clone(), Arc::clone(&handle));
        handle.set_state(ConnectionState::Registered);

        info!(
            conn_id = %handle.id,
            identity = %identity,
            "Connection registered"
        );

        if let Some(previous) = previous.filter(|p| p.id != handle.id) {
            self.supersede(&previous, &handle);
        }

        self.broadcast_presence().await;

        (handle, rx)
    }

    /// Closes a connection. Safe to call from every close path.
    ///
    /// Only the first call for a handle does anything: it forgets the
    /// connection and, if it still owned its presence entry, removes the
    /// entry and broadcasts. Returns whether this call performed the close.
    pub async fn close(&self, handle: &ConnectionHandle) -> bool {
        let Some(previous_state) = handle.begin_close() else {
            return false;
        };
        self.connections.remove(&handle.id);

        let removed = match (previous_state, handle.identity()) {
            (ConnectionState::Registered, Some(identity)) => {
                self.presence.deregister(identity, handle)
            }
            _ => false,
        };

        info!(
            conn_id = %handle.id,
            identity = ?handle.identity().map(Identity::as_str),
            presence_removed = removed,
            "Connection closed"
        );

        if removed {
            self.broadcast_presence().await;
        }

        true
    }

    /// Processes an inbound text frame from a client.
    pub async fn handle_inbound(&self, handle: &ConnectionHandle, raw_message: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                debug!(conn_id = %handle.id, error = %e, "Unparseable inbound message");
                self.send_event(
                    handle,
                    &ServerEvent::Error {
                        code: "INVALID_MESSAGE".to_string(),
                        message: format!("Failed to parse message: {e}"),
                    },
                );
                return;
            }
        };

        match msg {
            InboundMessage::Pong => handle.record_pong(),
            InboundMessage::GetOnlineUsers => {
                self.send_event(handle, &ServerEvent::OnlineUsers(self.presence.snapshot()));
            }
        }
    }

    /// Sends the full online set to every registered connection.
    ///
    /// Recipients whose queue is closed or full are evicted; each eviction
    /// round triggers another broadcast to the survivors.
    pub async fn broadcast_presence(&self) {
        let mut revision = self.fanout.lock().await;

        loop {
            *revision += 1;
            let online = self.presence.snapshot();
            let frame = match ServerEvent::OnlineUsers(online.clone()).to_frame() {
                Ok(f) => f,
                Err(e) => {
                    error!(error = %e, "Failed to serialize presence snapshot");
                    return;
                }
            };

            let recipients = self.presence.handles();
            let mut failed = Vec::new();
            for recipient in &recipients {
                match recipient.deliver(frame.clone()) {
                    Delivery::Delivered => {}
                    outcome => failed.push((Arc::clone(recipient), outcome)),
                }
            }

            debug!(
                revision = *revision,
                online = online.len(),
                recipients = recipients.len(),
                failed = failed.len(),
                "Presence broadcast"
            );

            if !self.evict(failed) {
                break;
            }
        }
    }

    /// Drops recipients that could not take a broadcast. Returns whether
    /// presence changed.
    fn evict(&self, failed: Vec<(Arc<ConnectionHandle>, Delivery)>) -> bool {
        let mut changed = false;
        for (handle, outcome) in failed {
            warn!(
                conn_id = %handle.id,
                outcome = ?outcome,
                "Evicting connection that could not receive presence"
            );
            if handle.begin_close().is_some() {
                self.connections.remove(&handle.id);
            }
            if let Some(identity) = handle.identity() {
                changed |= self.presence.deregister(identity, &handle);
            }
        }
        changed
    }

    /// Retires a connection whose identity was taken over by `successor`.
    fn supersede(&self, previous: &Arc<ConnectionHandle>, successor: &ConnectionHandle) {
        if !self.config.close_superseded {
            debug!(
                conn_id = %previous.id,
                "Superseded connection left open by configuration"
            );
            return;
        }

        self.send_event(
            previous,
            &ServerEvent::Superseded {
                replaced_by: successor.id,
            },
        );

        // The entry already points at the successor: no deregister, and the
        // successor's registration broadcast covers the change.
        if previous.begin_close().is_some() {
            self.connections.remove(&previous.id);
            info!(
                conn_id = %previous.id,
                replaced_by = %successor.id,
                "Closed superseded connection"
            );
        }
    }

    fn send_event(&self, handle: &ConnectionHandle, event: &ServerEvent) {
        match event.to_frame() {
            Ok(frame) => {
                if !handle.deliver(frame).is_delivered() {
                    debug!(conn_id = %handle.id, "Dropped event for unreachable connection");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize outbound event"),
        }
    }

    /// Closes every open connection (used during shutdown).
    pub async fn close_all(&self) {
        let all: Vec<Arc<ConnectionHandle>> = self
            .connections
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();

        let mut closed = 0usize;
        for conn in &all {
            if conn.begin_close().is_some() {
                closed += 1;
            }
            self.connections.remove(&conn.id);
            if let Some(identity) = conn.identity() {
                self.presence.deregister(identity, conn);
            }
        }
        info!(count = closed, "All connections closed");
    }

    /// Currently online identities.
    pub fn online(&self) -> Vec<Identity> {
        self.presence.snapshot()
    }

    /// Returns the total open connection count, anonymous included.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Returns the number of online identities.
    pub fn online_count(&self) -> usize {
        self.presence.len()
    }

    /// Returns the gateway configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}
