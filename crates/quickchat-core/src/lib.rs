//! # quickchat-core
//!
//! Core crate for QuickChat. Contains configuration schemas, the
//! [`Identity`](types::Identity) key, collaborator traits for user storage and
//! password verification, and the unified error system.
//!
//! This crate has **no** internal dependencies on other QuickChat crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::Identity;
