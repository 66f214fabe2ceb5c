//! One-time passcode repository.
//!
//! A passcode row is the only server-side state of the OTP flow: issuing a
//! code replaces all outstanding codes for the email, and verification
//! consumes the row in a single conditional `DELETE`. Expired rows are never
//! a match; they are swept opportunistically on the next send.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use revupage_core::Email;

use super::RepositoryError;

/// Repository for one-time passcode operations.
pub struct PasscodeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasscodeRepository<'a> {
    /// Create a new passcode repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Replace all outstanding codes for an email with a fresh one.
    ///
    /// This is a delete-then-insert, not a transaction: two concurrent sends
    /// for the same email can interleave and leave both codes outstanding.
    /// Known race, kept as-is; the verify path tolerates it because it
    /// consumes exactly the row matching the presented code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn replace(
        &self,
        email: &Email,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM one_time_passcodes WHERE email = $1 OR expires_at <= now()")
            .bind(email)
            .execute(self.pool)
            .await?;

        sqlx::query("INSERT INTO one_time_passcodes (email, code, expires_at) VALUES ($1, $2, $3)")
            .bind(email)
            .bind(code)
            .bind(expires_at)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Consume a matching, unexpired code.
    ///
    /// Returns `true` if a code was found and deleted. One-time use is
    /// enforced by the deletion itself; a second call with the same pair
    /// returns `false`. Wrong code, expired code, and already-used code are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn consume(&self, email: &Email, code: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM one_time_passcodes
             WHERE email = $1 AND code = $2 AND expires_at > now()",
        )
        .bind(email)
        .bind(code)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
