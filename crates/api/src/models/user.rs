//! User account model.

use chrono::{DateTime, Utc};

use revupage_core::{Email, UserId};

/// A registered account.
///
/// The password hash is deliberately not part of this struct; it is only
/// surfaced by the dedicated repository lookup on the password login path.
/// Accounts created through the OTP flow have no password at all.
#[derive(Debug, Clone)]
pub struct User {
    /// Database identifier.
    pub id: UserId,
    /// Unique email address, immutable after registration.
    pub email: Email,
    /// Display name, optional until the owner fills in their profile.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}
