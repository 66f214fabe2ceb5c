//! Authentication error types.

use thiserror::Error;

use revupage_core::EmailError as EmailParseError;

use crate::db::RepositoryError;
use crate::services::email::EmailError;
use crate::services::token::TokenError;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is structurally invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailParseError),

    /// The password doesn't meet requirements.
    #[error("password must be at least 8 characters")]
    WeakPassword,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No account exists for this email.
    #[error("user not found")]
    UserNotFound,

    /// Wrong password, or the account has no password set.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The one-time code is wrong, expired, or already used. Deliberately
    /// indistinguishable cases.
    #[error("invalid or expired code")]
    InvalidCode,

    /// Login called with neither a password nor a code.
    #[error("credential required")]
    MissingCredential,

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Token issuing failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Mail dispatch failed.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
