//! Password hash verification capability.

use crate::result::AppResult;

/// Opaque `verify(plaintext, hash) -> bool` capability.
///
/// `Ok(false)` means the password did not match; `Err` is reserved for
/// hashes that cannot be parsed at all.
pub trait PasswordVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Hashes a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// Checks a plaintext password against a stored hash.
    fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool>;
}
