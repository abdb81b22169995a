//! # quickchat-api
//!
//! HTTP API layer for QuickChat built on Axum.
//!
//! Provides the REST endpoints, the WebSocket upgrade and socket pump,
//! the session guard (middleware + extractor), DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
