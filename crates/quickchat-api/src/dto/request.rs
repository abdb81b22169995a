//! Request DTOs with validation.
//!
//! Fields default to empty so an omitted field reaches validation and
//! yields a 400 instead of a body-rejection.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use quickchat_core::error::AppError;
use quickchat_core::traits::ProfileUpdate;
use quickchat_service::SignUpInput;

/// Sign-up request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    /// Display name.
    #[validate(length(min = 1, message = "fullName is required"))]
    pub full_name: String,
    /// Login email.
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Biography.
    #[validate(length(min = 1, message = "bio is required"))]
    pub bio: String,
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            bio: req.bio,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Profile update request. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    /// Display name.
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    /// Biography.
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    /// Profile picture URL.
    #[validate(url)]
    pub profile_pic: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            bio: req.bio,
            profile_pic: req.profile_pic,
        }
    }
}

/// Runs derived validation, mapping failures to a `Validation` error.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate().map_err(|e| validation_error(&e))?;
    Ok(req)
}

fn validation_error(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            errs.iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"))
        })
        .collect();
    fields.sort();
    AppError::validation(format!("Missing details: {}", fields.join(", ")))
}
