//! Account self-service operations — sign-up, login, and profile management.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use quickchat_auth::{SessionToken, TokenService};
use quickchat_core::error::AppError;
use quickchat_core::traits::{PasswordVerifier, ProfileUpdate, UserDirectory};
use quickchat_core::types::{Identity, UserProfile, UserRecord};

use crate::context::RequestContext;

/// Data for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpInput {
    /// Display name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Biography.
    pub bio: String,
}

/// A successful sign-up or login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The account's public data.
    pub user: UserProfile,
    /// Freshly issued session token.
    pub token: SessionToken,
}

/// Handles account operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User storage.
    directory: Arc<dyn UserDirectory>,
    /// Password hasher.
    passwords: Arc<dyn PasswordVerifier>,
    /// Token issuer.
    tokens: Arc<TokenService>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            directory,
            passwords,
            tokens,
        }
    }

    /// Creates an account and signs it in.
    pub async fn sign_up(&self, input: SignUpInput) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(&input.email);
        if input.full_name.trim().is_empty()
            || email.is_empty()
            || input.password.is_empty()
            || input.bio.trim().is_empty()
        {
            return Err(AppError::validation("Missing details"));
        }

        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Account already exists"));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let now = Utc::now();
        let record = self
            .directory
            .insert(UserRecord {
                id: Identity::generate(),
                email,
                full_name: input.full_name.trim().to_string(),
                bio: input.bio,
                profile_pic: None,
                password_hash,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = self.tokens.issue(&record.id)?;
        info!(identity = %record.id, "Account created");

        Ok(AuthOutcome {
            user: record.profile(),
            token,
        })
    }

    /// Checks credentials and issues a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let record = self
            .directory
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self.passwords.verify(password, &record.password_hash)? {
            return Err(AppError::unauthenticated("Invalid credentials"));
        }

        let token = self.tokens.issue(&record.id)?;
        info!(identity = %record.id, "Login successful");

        Ok(AuthOutcome {
            user: record.profile(),
            token,
        })
    }

    /// Gets the current user's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<UserProfile, AppError> {
        self.directory
            .find_by_id(&ctx.identity)
            .await?
            .map(|record| record.profile())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    ///
    /// An empty `profile_pic` leaves the picture unchanged.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        mut update: ProfileUpdate,
    ) -> Result<UserProfile, AppError> {
        if let Some(full_name) = update.full_name.as_deref() {
            if full_name.trim().is_empty() {
                return Err(AppError::validation("Full name cannot be empty"));
            }
        }
        update.full_name = update.full_name.map(|n| n.trim().to_string());
        update.profile_pic = update.profile_pic.filter(|p| !p.trim().is_empty());

        let record = self
            .directory
            .update_profile(&ctx.identity, update)
            .await?;

        info!(identity = %ctx.identity, "Profile updated");

        Ok(record.profile())
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
