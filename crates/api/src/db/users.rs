//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use revupage_core::{Email, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::User;

const USER_COLUMNS: &str = "id, email, name, phone_number, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Create a new user.
    ///
    /// The password hash is optional: accounts created through the OTP flow
    /// have none until the owner later sets a password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: Option<&str>,
        phone_number: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name, phone_number, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(phone_number)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| "email already exists".to_owned()))?;

        user_from_row(&row)
    }

    /// Get a user together with their password hash, by email.
    ///
    /// The hash is `None` for OTP-only accounts. Returns `None` if no user
    /// exists for the email at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, Option<String>)>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = user_from_row(&r)?;
        let password_hash: Option<String> = r.try_get("password_hash")?;

        Ok(Some((user, password_hash)))
    }

    /// Update a user's profile fields.
    ///
    /// Only `name` and `phone_number` are mutable; a `None` leaves the stored
    /// value untouched. Email is immutable after registration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 phone_number = COALESCE($3, phone_number),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(phone_number)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        user_from_row(&row)
    }
}

/// Map a `users` row to the domain model.
fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
