//! Password hashing and verification for the local login path.
//!
//! Argon2id with a random per-password salt, stored as a PHC-format string.
//! Verification is constant-time inside the `argon2` crate, so neither a
//! fast unsalted hash nor a timing side channel is possible here.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::errors::UserError;

/// Hash a password with Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::Password(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| UserError::Password(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
