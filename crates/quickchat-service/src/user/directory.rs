//! In-memory [`UserDirectory`] for single-process deployments and tests.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use quickchat_core::error::AppError;
use quickchat_core::result::AppResult;
use quickchat_core::traits::{ProfileUpdate, UserDirectory};
use quickchat_core::types::{Identity, UserRecord};

/// Account store keyed by identity, with a unique email index.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    /// Identity → record.
    users: DashMap<Identity, UserRecord>,
    /// Email → identity.
    by_email: DashMap<String, Identity>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: &Identity) -> AppResult<Option<UserRecord>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let Some(id) = self.by_email.get(email).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn insert(&self, record: UserRecord) -> AppResult<UserRecord> {
        // Claiming the email slot first makes concurrent sign-ups for one
        // address resolve to exactly one winner.
        match self.by_email.entry(record.email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Account already exists")),
            Entry::Vacant(slot) => {
                slot.insert(record.id.clone());
                self.users.insert(record.id.clone(), record.clone());
                debug!(identity = %record.id, "User stored");
                Ok(record)
            }
        }
    }

    async fn update_profile(&self, id: &Identity, update: ProfileUpdate) -> AppResult<UserRecord> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(profile_pic) = update.profile_pic {
            user.profile_pic = Some(profile_pic);
        }
        user.updated_at = Utc::now();

        Ok(user.value().clone())
    }
}
