//! User storage collaborator.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Identity, UserRecord};

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub full_name: Option<String>,
    /// New biography.
    pub bio: Option<String>,
    /// New profile picture URL.
    pub profile_pic: Option<String>,
}

/// Persistent user-record lookup keyed by [`Identity`].
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Finds an account by identity.
    async fn find_by_id(&self, id: &Identity) -> AppResult<Option<UserRecord>>;

    /// Finds an account by login email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Stores a new account. Fails with `Conflict` when the email is taken.
    async fn insert(&self, record: UserRecord) -> AppResult<UserRecord>;

    /// Applies a profile update. Fails with `NotFound` for unknown identities.
    async fn update_profile(&self, id: &Identity, update: ProfileUpdate) -> AppResult<UserRecord>;
}
