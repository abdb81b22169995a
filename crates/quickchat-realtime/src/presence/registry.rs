//! In-memory presence registry backed by a sharded concurrent map.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use quickchat_core::Identity;

use super::store::PresenceStore;
use crate::connection::handle::ConnectionHandle;

/// Single-process [`PresenceStore`].
///
/// Each operation locks only the shard holding its key, so readers taking
/// a snapshot never stall writers on other shards for long. A snapshot
/// walks shards one at a time: it contains every identity registered and
/// not deregistered before the walk began, and nothing that was never
/// registered.
#[derive(Debug, Default)]
pub struct MemoryPresenceRegistry {
    /// Identity → the connection that last registered it.
    entries: DashMap<Identity, Arc<ConnectionHandle>>,
}

impl MemoryPresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl PresenceStore for MemoryPresenceRegistry {
    fn register(
        &self,
        identity: Identity,
        handle: Arc<ConnectionHandle>,
    ) -> Option<Arc<ConnectionHandle>> {
        let conn_id = handle.id;
        let previous = self.entries.insert(identity.clone(), handle);

        debug!(
            identity = %identity,
            conn_id = %conn_id,
            replaced = ?previous.as_ref().map(|h| h.id),
            "Presence registered"
        );

        previous
    }

    fn deregister(&self, identity: &Identity, handle: &ConnectionHandle) -> bool {
        let removed = self
            .entries
            .remove_if(identity, |_, current| current.id == handle.id)
            .is_some();

        if removed {
            debug!(identity = %identity, conn_id = %handle.id, "Presence deregistered");
        } else {
            debug!(
                identity = %identity,
                conn_id = %handle.id,
                "Ignored deregister for stale or unknown handle"
            );
        }

        removed
    }

    fn snapshot(&self) -> Vec<Identity> {
        let mut online: Vec<Identity> = self.entries.iter().map(|e| e.key().clone()).collect();
        online.sort();
        online
    }

    fn handles(&self) -> Vec<Arc<ConnectionHandle>> {
        self.entries.iter().map(|e| Arc::clone(e.value())).collect()
    }

    fn lookup(&self, identity: &Identity) -> Option<Arc<ConnectionHandle>> {
        self.entries.get(identity).map(|e| Arc::clone(e.value()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
