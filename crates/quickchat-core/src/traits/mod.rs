//! Collaborator traits defined in `quickchat-core` and implemented by other crates.

pub mod password;
pub mod user_directory;

pub use password::PasswordVerifier;
pub use user_directory::{ProfileUpdate, UserDirectory};
