//! Password hash verification.
//!
//! Stored hashes are PHC strings (`$argon2id$v=19$...`). A hash that cannot
//! be parsed never matches.

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString, rand_core::OsRng};
use zeroize::Zeroizing;

use crate::error::{AuthError, Result};

/// Capability to compare a plaintext password with a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// Returns `true` if `plaintext` matches `hash`.
    fn is_valid(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2 (any variant, parameters taken from the hash string).
#[derive(Clone, Copy, Debug, Default)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn is_valid(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }
}

/// Hashes `plaintext` with Argon2id and a random salt.
///
/// # Errors
///
/// Returns [`AuthError::InvalidArgument`] if hashing fails (e.g. the input
/// exceeds Argon2's length limits).
pub fn hash_password(plaintext: &str) -> Result<Zeroizing<String>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::invalid_argument(format!("password hashing failed: {e}")))?;
    Ok(Zeroizing::new(hash.to_string()))
}
