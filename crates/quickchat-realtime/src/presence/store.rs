//! The presence storage interface.
//!
//! The gateway only talks to presence through this trait, so a shared
//! backing store for multi-node deployments can replace the in-memory
//! registry without touching connection handling.

use std::sync::Arc;

use quickchat_core::Identity;

use crate::connection::handle::ConnectionHandle;

/// Mapping from identity to its single active connection.
///
/// No operation fails. Implementations must be safe under arbitrary
/// concurrent calls for the same and different identities.
pub trait PresenceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Inserts or replaces the entry for `identity`, returning the handle it displaced.
    fn register(
        &self,
        identity: Identity,
        handle: Arc<ConnectionHandle>,
    ) -> Option<Arc<ConnectionHandle>>;

    /// Removes the entry for `identity` only if it still points at `handle`.
    ///
    /// Returns whether an entry was removed. A stale handle or an unknown
    /// identity is a no-op.
    fn deregister(&self, identity: &Identity, handle: &ConnectionHandle) -> bool;

    /// Currently online identities, sorted.
    fn snapshot(&self) -> Vec<Identity>;

    /// Currently registered connection handles.
    fn handles(&self) -> Vec<Arc<ConnectionHandle>>;

    /// The connection currently holding `identity`, if any.
    fn lookup(&self, identity: &Identity) -> Option<Arc<ConnectionHandle>>;

    /// Number of online identities.
    fn len(&self) -> usize;

    /// Whether nobody is online.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
