//! Account storage and self-service operations.

pub mod directory;
pub mod service;

pub use directory::MemoryUserDirectory;
pub use service::{AuthOutcome, SignUpInput, UserService};
