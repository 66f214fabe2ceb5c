//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The password doesn't meet requirements.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooWeak,

    /// Hashing failed.
    #[error("failed to hash password")]
    Hash,

    /// The password doesn't match, or the stored hash is unreadable.
    #[error("invalid credentials")]
    Mismatch,
}

/// Validate that a password meets requirements.
///
/// # Errors
///
/// Returns `PasswordError::TooWeak` if the password is too short.
pub fn validate(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooWeak);
    }

    Ok(())
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored hash.
///
/// An unreadable hash and a wrong password both report `Mismatch`; the
/// caller cannot distinguish the two cases.
///
/// # Errors
///
/// Returns `PasswordError::Mismatch` on any verification failure.
pub fn verify(password: &str, stored_hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::Mismatch)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hashed = hash("correct horse battery").unwrap();
        assert!(verify("correct horse battery", &hashed).is_ok());
        assert!(verify("wrong password", &hashed).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("same password").unwrap();
        let b = hash("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify("whatever", "not-a-phc-string"),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_validate_length() {
        assert!(validate("1234567").is_err());
        assert!(validate("12345678").is_ok());
    }
}
