//! Database operations for the RevuPage `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts (password optional; OTP-only accounts are valid)
//! - `one_time_passcodes` - Short-lived email login codes
//! - `businesses` - Public profiles, one per owner
//!
//! Queries use the runtime sqlx API; uniqueness of email, slug, business
//! code, and owner is enforced by unique indexes, and unique-violation
//! errors are mapped to [`RepositoryError::Conflict`]. That mapping, not any
//! application-level pre-check, is the authoritative uniqueness signal under
//! concurrent writes.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and are embedded with
//! `sqlx::migrate!`, applied at startup.

pub mod businesses;
pub mod passcodes;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use businesses::BusinessRepository;
pub use passcodes::PasscodeRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to [`RepositoryError::Conflict`] when it is a unique
/// violation, passing everything else through as a database error.
///
/// The conflict message is chosen by `describe`, which receives the violated
/// constraint name (when the driver reports one) so callers can distinguish
/// which uniqueness rule fired.
pub(crate) fn map_unique_violation(
    e: sqlx::Error,
    describe: impl Fn(Option<&str>) -> String,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(describe(db_err.constraint()));
    }
    RepositoryError::Database(e)
}
