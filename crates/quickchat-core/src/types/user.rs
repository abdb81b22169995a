//! User account records exchanged with the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// A stored user account, including its password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Account key.
    pub id: Identity,
    /// Login email, unique across accounts.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Free-form biography.
    pub bio: String,
    /// URL of the profile picture, if one was set.
    pub profile_pic: Option<String>,
    /// Opaque password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last changed.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Returns the public view of this record.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            bio: self.bio.clone(),
            profile_pic: self.profile_pic.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public user data returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account key.
    #[serde(rename = "_id")]
    pub id: Identity,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Biography.
    pub bio: String,
    /// Profile picture URL.
    pub profile_pic: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}
