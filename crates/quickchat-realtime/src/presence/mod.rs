//! Online presence: which identity is reachable over which connection.

pub mod registry;
pub mod store;

pub use registry::MemoryPresenceRegistry;
pub use store::PresenceStore;
