//! # quickchat-service
//!
//! Business logic service layer for QuickChat. Services orchestrate the
//! user directory, password hashing, and token issuance to implement the
//! account use cases behind the REST API.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod user;

pub use context::RequestContext;
pub use user::{AuthOutcome, MemoryUserDirectory, SignUpInput, UserService};
