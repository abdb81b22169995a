//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use quickchat_auth::{PasswordHasher, TokenService};
use quickchat_core::config::AppConfig;
use quickchat_core::error::AppError;
use quickchat_core::traits::UserDirectory;
use quickchat_realtime::RealtimeEngine;
use quickchat_service::{MemoryUserDirectory, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session token issuer/verifier
    pub tokens: Arc<TokenService>,

    // ── Services ─────────────────────────────────────────────
    /// Account service
    pub user_service: Arc<UserService>,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket presence engine
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Wires every collaborator with its in-process implementation.
    pub fn build(config: AppConfig) -> Result<Self, AppError> {
        let directory: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::new());
        Self::with_directory(config, directory)
    }

    /// Wires the state around a caller-supplied user directory.
    pub fn with_directory(
        config: AppConfig,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::new(&config.auth)?);
        let user_service = Arc::new(UserService::new(
            directory,
            Arc::new(PasswordHasher::new()),
            Arc::clone(&tokens),
        ));
        let realtime = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            Arc::clone(&tokens),
        ));

        Ok(Self {
            config: Arc::new(config),
            tokens,
            user_service,
            realtime,
        })
    }
}
