//! Individual WebSocket connection handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use quickchat_core::Identity;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A frame queued for the socket writer.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// Serialized JSON event. Shared so a broadcast serializes once.
    Text(Arc<str>),
    /// Transport-level keepalive ping.
    Ping,
}

/// Lifecycle of one connection as seen by the presence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConnectionState {
    /// Accepted, not yet registered.
    Connecting = 0,
    /// Holds the presence entry for its identity.
    Registered = 1,
    /// Open without an identity; never appears in presence.
    Anonymous = 2,
    /// Closed; cleanup has run.
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Registered,
            2 => Self::Anonymous,
            _ => Self::Closed,
        }
    }
}

/// Result of queueing a frame on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Frame queued.
    Delivered,
    /// Queue at capacity; the peer is not keeping up.
    Full,
    /// Connection closed or its writer is gone.
    Closed,
}

impl Delivery {
    /// Returns whether the frame was queued.
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender for the connection's bounded outbound queue, the
/// identity captured at handshake time, and the close flag that makes
/// cleanup run exactly once. Two handles are equal iff their ids are.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Identity presented at handshake, if any
    identity: Option<Identity>,
    /// Sender for outbound frames
    sender: mpsc::Sender<OutboundFrame>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last pong, milliseconds since epoch
    last_pong_ms: AtomicI64,
    /// Current [`ConnectionState`]
    state: AtomicU8,
    /// Set once by whichever close path wins
    closed: AtomicBool,
    /// Wakes the socket task when the connection is closed from elsewhere
    close_notify: Notify,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(identity: Option<Identity>, sender: mpsc::Sender<OutboundFrame>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identity,
            sender,
            connected_at: now,
            last_pong_ms: AtomicI64::new(now.timestamp_millis()),
            state: AtomicU8::new(ConnectionState::Connecting as u8),
            closed: AtomicBool::new(false),
            close_notify: Notify::new(),
        }
    }

    /// Identity captured at connect time.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: ConnectionState) {
        if !self.is_closed() {
            self.state.store(state as u8, Ordering::Release);
        }
    }

    /// Queue a frame without waiting.
    pub fn deliver(&self, frame: OutboundFrame) -> Delivery {
        if self.is_closed() {
            return Delivery::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Flip the close flag.
    ///
    /// Returns the state held just before closing for the single caller
    /// that wins; every later caller gets `None`.
    pub fn begin_close(&self) -> Option<ConnectionState> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return None;
        }
        let previous = self
            .state
            .swap(ConnectionState::Closed as u8, Ordering::AcqRel);
        self.close_notify.notify_waiters();
        Some(ConnectionState::from_u8(previous))
    }

    /// Check if the connection has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves once the connection has been closed by any path.
    pub async fn closed(&self) {
        loop {
            let notified = self.close_notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }

    /// Record a pong response
    pub fn record_pong(&self) {
        self.last_pong_ms
            .store(Utc::now().timestamp_millis(), Ordering::Release);
    }

    /// Time of the last pong (or of connect, before the first pong).
    pub fn last_pong(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_pong_ms.load(Ordering::Acquire))
            .unwrap_or(self.connected_at)
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(buffer: usize) -> (ConnectionHandle, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(buffer);
        (ConnectionHandle::new(Identity::parse("u1").ok(), tx), rx)
    }

    #[test]
    fn test_begin_close_once() {
        let (h, _rx) = handle(1);
        h.set_state(ConnectionState::Registered);
        assert_eq!(h.begin_close(), Some(ConnectionState::Registered));
        assert_eq!(h.begin_close(), None);
        assert_eq!(h.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_state_frozen_after_close() {
        let (h, _rx) = handle(1);
        h.begin_close();
        h.set_state(ConnectionState::Registered);
        assert_eq!(h.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_deliver_reports_full_and_closed() {
        let (h, rx) = handle(1);
        assert_eq!(h.deliver(OutboundFrame::Ping), Delivery::Delivered);
        assert_eq!(h.deliver(OutboundFrame::Ping), Delivery::Full);
        drop(rx);
        assert_eq!(h.deliver(OutboundFrame::Ping), Delivery::Closed);
    }

    #[tokio::test]
    async fn test_closed_wakes_waiter() {
        let (h, _rx) = handle(1);
        let h = Arc::new(h);
        let waiter = {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.closed().await })
        };
        tokio::task::yield_now().await;
        h.begin_close();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke")
            .unwrap();
    }
}
