//! # quickchat-auth
//!
//! Stateless session credentials and password hashing for QuickChat.
//!
//! ## Modules
//!
//! - `jwt` — claims layout, HS256 signing and verification
//! - `token` — [`TokenService`], the `issue`/`verify` pair used by the rest of the system
//! - `password` — Argon2id hashing behind the core `PasswordVerifier` trait

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use token::{SessionToken, TokenService};
